/// Application name
pub const APP_NAME: &str = "PostApp";

/// Daily reading goal used when no goal has been persisted yet
pub const DEFAULT_DAILY_GOAL: u32 = 5;

/// Key under which the reading goal blob is stored locally
pub const READING_GOAL_KEY: &str = "ReadingGoalData";

/// How long a post detail must stay open before it counts as read (ms)
pub const DEFAULT_READ_DWELL_MS: u64 = 500;

/// Maximum post title length in characters
pub const MAX_TITLE_LEN: usize = 200;

/// Maximum post subtitle length in characters
pub const MAX_SUBTITLE_LEN: usize = 300;

/// Maximum plain-text body length in characters (64 KiB of text)
pub const MAX_BODY_LEN: usize = 65_536;

/// Number of body characters shown in list previews
pub const PREVIEW_LEN: usize = 120;

/// Default HTTP API port (server)
pub const DEFAULT_HTTP_PORT: u16 = 8080;
