//! # 隐写核心模块
//!
//! 比特流格式：`[4 字节大端序长度][负载]`，两部分首尾相接、中间没有填充，
//! 按宽度为 `k` 的块依次写入载体各通道的低 `k` 位，顺序为光栅顺序。
//! `k` 不写入载体，编码端和解码端必须事先约定。

use crate::bits::{BitChunkJoiner, BitChunkSplitter, ChunkWidth};
use crate::carrier::{ChannelCarrier, RasterCursor};
use crate::constants::{HEADER_SIZE, PROGRESS_INTERVAL};
use crate::error::{Result, StegoError};
use crate::progress::{NoProgress, ProgressReporter};
use log::{debug, warn};

/// 把负载长度编码为 4 字节大端序长度头。
///
/// # Errors
///
/// 长度超过 `u32::MAX` 时返回 [`StegoError::PayloadTooLarge`]。
pub fn frame_header(len: usize) -> Result<[u8; HEADER_SIZE]> {
    u32::try_from(len)
        .map(u32::to_be_bytes)
        .map_err(|_| StegoError::PayloadTooLarge { len })
}

/// 解析 4 字节大端序长度头。
pub fn parse_header(header: [u8; HEADER_SIZE]) -> u32 {
    u32::from_be_bytes(header)
}

/// 把 `payload` 连同长度头写入 `carrier`。
///
/// 见 [`encode_with_progress`]。
pub fn encode<C>(carrier: &mut C, payload: &[u8], width: ChunkWidth) -> Result<()>
where
    C: ChannelCarrier + ?Sized,
{
    encode_with_progress(carrier, payload, width, &mut NoProgress)
}

/// 把 `payload` 连同长度头写入 `carrier`，并定期汇报进度。
///
/// 每个被使用的通道只有低 `k` 位会改变；比特流写完后剩余的通道保持原样。
/// 进度单位为比特流字节 (包含长度头)。
///
/// # Errors
///
/// * [`StegoError::PayloadTooLarge`] - 负载长度无法写入长度头，此时载体未被修改。
/// * [`StegoError::CarrierExhausted`] - 载体在比特流写完之前耗尽。此时载体已被部分改写，
///   调用者不应把它当作有效结果保存。
pub fn encode_with_progress<C, P>(
    carrier: &mut C,
    payload: &[u8],
    width: ChunkWidth,
    progress: &mut P,
) -> Result<()>
where
    C: ChannelCarrier + ?Sized,
    P: ProgressReporter + ?Sized,
{
    let header = frame_header(payload.len())?;
    let mut stream = Vec::with_capacity(HEADER_SIZE + payload.len());
    stream.extend_from_slice(&header);
    stream.extend_from_slice(payload);

    let mut chunks = BitChunkSplitter::new(&stream, width);
    let mut cursor = RasterCursor::over(&*carrier);
    debug!(
        "encoding {} bytes as {} chunks of {} bits into {} channel positions",
        stream.len(),
        chunks.total_chunks(),
        width,
        cursor.total()
    );

    let clear_mask = width.clear_mask();
    while let Some(chunk) = chunks.next() {
        let Some(position) = cursor.next() else {
            warn!(
                "carrier exhausted while writing byte {} of {}",
                chunk.byte_index,
                stream.len()
            );
            return Err(StegoError::CarrierExhausted {
                consumed: cursor.consumed(),
            });
        };

        let value = (position.read(&*carrier) & clear_mask) | chunk.value;
        position.write(carrier, value);

        if cursor.consumed() % PROGRESS_INTERVAL == 0 {
            progress.report(chunks.consumed_bytes(), chunks.total_bytes());
        }
    }

    progress.report(stream.len(), stream.len());
    debug!(
        "encoding used {} of {} channel positions",
        cursor.consumed(),
        cursor.total()
    );
    Ok(())
}

/// 从 `carrier` 中恢复负载。
///
/// 见 [`decode_with_progress`]。
pub fn decode<C>(carrier: &C, width: ChunkWidth) -> Result<Vec<u8>>
where
    C: ChannelCarrier + ?Sized,
{
    decode_with_progress(carrier, width, &mut NoProgress)
}

/// 从 `carrier` 中恢复负载，并在头部和负载两个阶段分别汇报进度。
///
/// 先读出 4 字节长度头，再沿同一个游标继续读出声明长度的负载；读过的位置不会重复读取。
///
/// # Errors
///
/// * [`StegoError::CarrierExhausted`] - 载体太小，连长度头都无法读完。
/// * [`StegoError::CorruptHeader`] - 长度头声明的负载不可能装在剩余的载体中
///   (载体没有隐藏数据、已损坏或 `k` 不匹配)。
pub fn decode_with_progress<C, P>(
    carrier: &C,
    width: ChunkWidth,
    progress: &mut P,
) -> Result<Vec<u8>>
where
    C: ChannelCarrier + ?Sized,
    P: ProgressReporter + ?Sized,
{
    let mut cursor = RasterCursor::over(carrier);

    let header_bytes = read_bytes(carrier, &mut cursor, width, HEADER_SIZE, &mut *progress)?;
    let mut header = [0u8; HEADER_SIZE];
    header.copy_from_slice(&header_bytes);
    let declared = parse_header(header);

    let available = cursor.remaining() / width.chunks_per_byte();
    let body_len = match usize::try_from(declared) {
        Ok(len) if len <= available => len,
        _ => {
            warn!("header declares {declared} bytes, carrier only holds {available} more");
            return Err(StegoError::CorruptHeader {
                declared,
                available,
            });
        }
    };
    debug!("header declares {body_len} bytes, {available} bytes available");

    read_bytes(carrier, &mut cursor, width, body_len, progress)
}

/// 沿 `cursor` 继续读取，直到恰好拼出 `count` 个字节。
fn read_bytes<C, P>(
    carrier: &C,
    cursor: &mut RasterCursor,
    width: ChunkWidth,
    count: usize,
    progress: &mut P,
) -> Result<Vec<u8>>
where
    C: ChannelCarrier + ?Sized,
    P: ProgressReporter + ?Sized,
{
    let low_mask = width.low_mask();
    let mut joiner = BitChunkJoiner::with_capacity(width, count);

    while joiner.completed() < count {
        let Some(position) = cursor.next() else {
            return Err(StegoError::CarrierExhausted {
                consumed: cursor.consumed(),
            });
        };

        joiner.push(position.read(carrier) & low_mask);

        if cursor.consumed() % PROGRESS_INTERVAL == 0 {
            progress.report(joiner.completed(), count);
        }
    }

    progress.report(count, count);
    Ok(joiner.finalize())
}
