//! `dingtalk send` - Send a robot message.

use anyhow::{Context, Result};

use dingtalk_client::{Message, Robot, WebhookConfig};

use crate::cli::{MentionArgs, SendArgs, SendKind};
use crate::exit_codes::SUCCESS;

pub async fn run(args: SendArgs) -> Result<i32> {
    let message = build_message(args.kind, args.mention);

    let mut config = WebhookConfig::default()
        .with_url(args.robot.url)
        .with_token(args.robot.token)
        .with_timeout_secs(args.robot.timeout)
        .with_max_retries(args.robot.retries);
    if let Some(secret) = args.robot.secret {
        config = config.with_secret(secret);
    }

    let robot = Robot::new(config).context("failed to create robot client")?;
    let envelope = robot
        .send(&message)
        .await
        .with_context(|| format!("failed to send {} message", message.kind()))?;

    tracing::info!(errmsg = %envelope.error_message, "message sent");
    println!("sent ({})", message.kind());
    Ok(SUCCESS)
}

fn build_message(kind: SendKind, mention: MentionArgs) -> Message {
    let message = match kind {
        SendKind::Text { content } => Message::text(content),
        SendKind::Markdown { title, text } => Message::markdown(title, text),
        SendKind::Link {
            title,
            text,
            url,
            picture,
        } => {
            let link = Message::link(title, text, url);
            match picture {
                Some(pic) => link.with_picture(pic),
                None => link,
            }
        }
    };

    if mention.at_all {
        message.at_all()
    } else if !mention.at_mobile.is_empty() {
        message.at_mobiles(mention.at_mobile)
    } else {
        message
    }
}
