//! Exit codes for the `dingtalk` binary.

use dingtalk_client::DingTalkError;

pub const SUCCESS: i32 = 0;
pub const INTERNAL_ERROR: i32 = 2;

/// Map a command failure to an exit code, preferring the client's own code.
pub fn from_error(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<DingTalkError>())
        .map(DingTalkError::exit_code)
        .unwrap_or(INTERNAL_ERROR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_client_error_code_survives_context() {
        let result: Result<(), DingTalkError> = Err(DingTalkError::Api {
            code: 300001,
            message: "invalid token".into(),
            payload: None,
        });
        let err = result.context("send failed").unwrap_err();
        assert_eq!(from_error(&err), 3);
    }

    #[test]
    fn test_other_errors_are_internal() {
        let err = anyhow::anyhow!("boom");
        assert_eq!(from_error(&err), INTERNAL_ERROR);
    }
}
