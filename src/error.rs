//! # 错误类型模块
//!
//! 隐写核心 (分块、载体遍历、编码与解码) 的全部失败情形。
//! 命令处理层会在这些错误之上用 `anyhow` 附加文件路径等上下文。

use thiserror::Error;

/// 隐写核心的结果类型别名。
pub type Result<T> = std::result::Result<T, StegoError>;

/// 编码或解码过程中可能出现的错误。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StegoError {
    /// 分块宽度不是 8 的正因数 (只接受 1、2、4、8)。
    #[error("invalid chunk width {0}: must be one of 1, 2, 4 or 8")]
    InvalidChunkWidth(u8),

    /// 比特流尚未写完 (或读完) 时载体的通道位置已经用尽。
    #[error("carrier exhausted after {consumed} channel positions")]
    CarrierExhausted { consumed: usize },

    /// 头部声明的长度不可能装在剩余的载体中。
    #[error("corrupt header: declares {declared} bytes but only {available} bytes remain in the carrier")]
    CorruptHeader { declared: u32, available: usize },

    /// 负载长度无法用 4 字节的长度头表示。
    #[error("payload of {len} bytes does not fit in a 4-byte length header")]
    PayloadTooLarge { len: usize },
}
