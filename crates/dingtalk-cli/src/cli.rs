use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "dingtalk",
    version,
    about = "Send DingTalk robot messages and look up DingTalk users"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Send a message through a custom robot
    Send(SendArgs),
    /// User identity lookups
    User(UserArgs),
    Version,
}

#[derive(Args, Debug)]
pub struct RobotArgs {
    /// Robot access token
    #[arg(long, env = "DINGTALK_ROBOT_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Robot signing secret (unsigned when omitted)
    #[arg(long, env = "DINGTALK_ROBOT_SECRET", hide_env_values = true)]
    pub secret: Option<String>,

    /// Robot send endpoint
    #[arg(
        long,
        env = "DINGTALK_ROBOT_URL",
        default_value = "https://oapi.dingtalk.com/robot/send"
    )]
    pub url: String,

    /// Extra attempts on network or decode failure
    #[arg(long, env = "DINGTALK_MAX_RETRIES", default_value_t = 0)]
    pub retries: u32,

    /// Request timeout in seconds
    #[arg(long, env = "DINGTALK_TIMEOUT", default_value_t = 30)]
    pub timeout: u64,
}

#[derive(Args, Debug)]
pub struct MentionArgs {
    /// Mention everyone in the chat
    #[arg(long, conflicts_with = "at_mobile")]
    pub at_all: bool,

    /// Mention a member by mobile number (repeatable)
    #[arg(long = "at-mobile", value_name = "MOBILE")]
    pub at_mobile: Vec<String>,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    #[command(flatten)]
    pub robot: RobotArgs,

    #[command(flatten)]
    pub mention: MentionArgs,

    #[command(subcommand)]
    pub kind: SendKind,
}

#[derive(Subcommand, Debug)]
pub enum SendKind {
    /// Plain text
    Text { content: String },
    /// Markdown with a title shown in notifications
    Markdown { title: String, text: String },
    /// Link card
    Link {
        title: String,
        text: String,
        url: String,
        /// Thumbnail URL
        #[arg(long)]
        picture: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct UserArgs {
    /// API base URL
    #[arg(
        long,
        env = "DINGTALK_API_URL",
        default_value = "https://oapi.dingtalk.com",
        global = true
    )]
    pub base_url: String,

    /// Extra attempts on network or decode failure
    #[arg(long, env = "DINGTALK_MAX_RETRIES", default_value_t = 0, global = true)]
    pub retries: u32,

    /// Request timeout in seconds
    #[arg(long, env = "DINGTALK_TIMEOUT", default_value_t = 30, global = true)]
    pub timeout: u64,

    #[command(subcommand)]
    pub cmd: UserCmd,
}

#[derive(Args, Debug)]
pub struct AppArgs {
    /// App key (appId for the login app)
    #[arg(long, env = "DINGTALK_APP_KEY")]
    pub app_key: String,

    /// App secret
    #[arg(long, env = "DINGTALK_APP_SECRET", hide_env_values = true)]
    pub app_secret: String,
}

#[derive(Args, Debug)]
pub struct TokenArgs {
    /// Access token from `dingtalk user token`
    #[arg(long, env = "DINGTALK_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: String,
}

#[derive(Subcommand, Debug)]
pub enum UserCmd {
    /// Fetch an app access token
    Token(AppArgs),
    /// Resolve a temp auth code to the user's identity
    ByCode {
        code: String,
        #[command(flatten)]
        app: AppArgs,
    },
    /// Map a union id to the enterprise user id
    UnionId {
        union_id: String,
        #[command(flatten)]
        token: TokenArgs,
    },
    /// Fetch a user's profile
    Get {
        user_id: String,
        #[command(flatten)]
        token: TokenArgs,
        /// Response language
        #[arg(long, default_value = "zh_CN")]
        language: String,
    },
}
