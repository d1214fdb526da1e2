//! # 进度汇报模块
//!
//! 编码和解码按固定节奏调用 [`ProgressReporter`]。汇报只是旁路观察，
//! 不会影响编解码的状态或控制流。

use colored::Colorize;
use std::io::{self, Write};

/// 接收 `(已处理, 总数)` 形式的进度通知。
pub trait ProgressReporter {
    fn report(&mut self, processed: usize, total: usize);
}

/// 忽略所有进度通知。
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&mut self, _processed: usize, _total: usize) {}
}

/// 任意 `FnMut(usize, usize)` 闭包都可以作为进度汇报器。
impl<F: FnMut(usize, usize)> ProgressReporter for F {
    fn report(&mut self, processed: usize, total: usize) {
        self(processed, total)
    }
}

/// 在标准错误输出上反复改写同一行的进度条。
#[derive(Debug)]
pub struct ConsoleProgress {
    label: &'static str,
}

impl ConsoleProgress {
    /// `label` 是行首的动词，例如 `"Encoded"` 或 `"Decoded"`。
    pub fn new(label: &'static str) -> Self {
        Self { label }
    }
}

/// 计算百分比；总数为 0 时视为已完成。
pub fn percentage(processed: usize, total: usize) -> usize {
    if total == 0 {
        return 100;
    }
    ((processed as f64 / total as f64) * 100.0).round() as usize
}

impl ProgressReporter for ConsoleProgress {
    fn report(&mut self, processed: usize, total: usize) {
        let line = format!(
            "\r{} {}% of bytes ({} / {})",
            self.label,
            percentage(processed, total).to_string().yellow().bold(),
            processed,
            total
        );

        let mut stderr = io::stderr().lock();
        // 进度输出失败不应中断编解码
        let _ = stderr.write_all(line.as_bytes());
        if processed >= total {
            let _ = stderr.write_all(b"\n");
        }
        let _ = stderr.flush();
    }
}
