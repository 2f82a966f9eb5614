use thiserror::Error;

use shared::error::AppError;

/// 服务器启动/运行错误 (请求级错误使用 [`AppError`])
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("应用错误 [{}]: {}", .0.code, .0.message)]
    App(#[from] AppError),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("内部服务器错误: {0}")]
    Internal(#[from] anyhow::Error),
}

/// 服务器 Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;

    #[test]
    fn app_error_keeps_its_code() {
        let err: ServerError = AppError::database("unable to open database file").into();
        match &err {
            ServerError::App(inner) => assert_eq!(inner.code, ErrorCode::DatabaseError),
            other => panic!("unexpected variant: {other:?}"),
        }
        assert_eq!(
            err.to_string(),
            "应用错误 [9002]: unable to open database file"
        );
    }
}
