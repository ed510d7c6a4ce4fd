//! `dingtalk user` - User identity lookups.

use anyhow::{Context, Result};
use serde::Serialize;

use dingtalk_client::{AccessToken, AppCredential, RetryPolicy, UserClient, UserConfig};

use crate::cli::{UserArgs, UserCmd};
use crate::exit_codes::SUCCESS;

pub async fn run(args: UserArgs) -> Result<i32> {
    let mut config = UserConfig::default()
        .with_base_url(args.base_url)
        .with_timeout_secs(args.timeout);
    if let UserCmd::Get { language, .. } = &args.cmd {
        config = config.with_language(language.clone());
    }

    let client = UserClient::new(config)
        .context("failed to create user client")?
        .with_retry_policy(RetryPolicy::immediate(args.retries));

    match args.cmd {
        UserCmd::Token(app) => {
            let credential = AppCredential::new(app.app_key, app.app_secret);
            let envelope = client
                .get_access_token(&credential)
                .await
                .context("failed to fetch access token")?;
            print_json(&envelope.payload)?;
        }
        UserCmd::ByCode { code, app } => {
            let credential = AppCredential::new(app.app_key, app.app_secret);
            let envelope = client
                .get_user_info_by_temp_code(&code, &credential)
                .await
                .context("failed to exchange temp auth code")?;
            print_json(&envelope.payload)?;
        }
        UserCmd::UnionId { union_id, token } => {
            let envelope = client
                .get_user_id_by_union_id(&union_id, &AccessToken::new(token.access_token))
                .await
                .with_context(|| format!("failed to look up union id {}", union_id))?;
            print_json(&envelope.payload)?;
        }
        UserCmd::Get { user_id, token, .. } => {
            let envelope = client
                .get_user_by_id(&user_id, &AccessToken::new(token.access_token))
                .await
                .with_context(|| format!("failed to fetch user {}", user_id))?;
            print_json(&envelope.payload)?;
        }
    }

    Ok(SUCCESS)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
