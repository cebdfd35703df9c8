//! Route paths, one constant per method and path.

pub const GET_API_HEALTH: &str = "/api/health";

pub const GET_API_AUTH_USER: &str = "/api/auth/user";
pub const POST_API_AUTH_LOGOUT: &str = "/api/auth/logout";
pub const POST_API_AUTH_MOBILE_HANDOFF: &str = "/api/auth/mobile-handoff";
pub const POST_API_AUTH_MOBILE_EXCHANGE: &str = "/api/auth/mobile-exchange";

pub const PATCH_API_PROFILE: &str = "/api/profile";

pub const GET_API_STORIES: &str = "/api/stories";
pub const POST_API_STORIES: &str = "/api/stories";
pub const GET_API_STORIES_MY: &str = "/api/stories/my";
pub const GET_API_STORIES_SEARCH: &str = "/api/stories/search";
pub const GET_API_STORIES_PERSONALIZED: &str = "/api/stories/personalized";
pub const GET_API_STORIES_ID: &str = "/api/stories/{id}";
pub const PATCH_API_STORIES_ID: &str = "/api/stories/{id}";
pub const DELETE_API_STORIES_ID: &str = "/api/stories/{id}";

pub const POST_API_STORIES_ID_LIKE: &str = "/api/stories/{id}/like";
pub const DELETE_API_STORIES_ID_LIKE: &str = "/api/stories/{id}/like";
pub const GET_API_STORIES_ID_LIKES: &str = "/api/stories/{id}/likes";
pub const GET_API_STORIES_ID_COMMENTS: &str = "/api/stories/{id}/comments";
pub const POST_API_STORIES_ID_COMMENTS: &str = "/api/stories/{id}/comments";
pub const POST_API_STORIES_ID_BOOKMARK: &str = "/api/stories/{id}/bookmark";
pub const DELETE_API_STORIES_ID_BOOKMARK: &str = "/api/stories/{id}/bookmark";
pub const GET_API_STORIES_ID_BOOKMARK_STATUS: &str = "/api/stories/{id}/bookmark-status";
pub const GET_API_BOOKMARKS: &str = "/api/bookmarks";

pub const POST_API_USERS_ID_FOLLOW: &str = "/api/users/{id}/follow";
pub const DELETE_API_USERS_ID_FOLLOW: &str = "/api/users/{id}/follow";
pub const GET_API_USERS_ID_FOLLOW_STATUS: &str = "/api/users/{id}/follow-status";
