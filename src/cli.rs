//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use crate::bits::ChunkWidth;
use crate::constants::CHUNK_WIDTH_ENV;
use clap::Parser;
use std::path::PathBuf;

/// 一款基于分块 LSB (最低有效位) 隐写术的命令行工具，用于在无损格式图像 (如 PNG, BMP) 中隐藏或恢复任意文件。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于分块 LSB (最低有效位) 隐写术的命令行工具，用于在无损格式图像 (如 PNG, BMP) 中隐藏或恢复任意文件。\n每个颜色通道的低 k 位 (k = 1, 2, 4, 8) 用来承载数据，隐藏和恢复时必须使用相同的 k。"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令：hide (隐藏)、recover (恢复) 和 capacity (容量)。
#[derive(Parser, Debug)]
pub enum Commands {
    /// 在无损格式图像 (如 PNG, BMP) 中隐藏一个文件。
    Hide(HideArgs),

    /// 从经过隐写的图像中恢复隐藏的文件。
    Recover(RecoverArgs),

    /// 显示图像在给定分块宽度下能隐藏的最大字节数。
    Capacity(CapacityArgs),
}

/// 'hide' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct HideArgs {
    /// 用于隐写的输入图像文件路径 (如 PNG, BMP)。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 要隐藏的文件路径。
    #[arg(short = 'f', long)]
    pub data: PathBuf,

    /// 隐写完成后，保存结果图像的输出路径。
    /// 默认为输入图像所在目录下的 `doctored_<原文件名>.png`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 输出文件已存在时强制覆盖。
    #[arg(long)]
    pub force: bool,

    /// 每个颜色通道用来隐藏数据的低位比特数 (1, 2, 4 或 8)。
    #[arg(short = 'k', long, env = CHUNK_WIDTH_ENV, default_value_t = ChunkWidth::default())]
    pub chunk_width: ChunkWidth,
}

/// 'recover' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct RecoverArgs {
    /// 已隐藏数据的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 恢复数据后，保存文件内容的输出路径。
    /// 默认为图像所在目录下的 `recovered_<原文件名>.bin`。
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// 输出文件已存在时强制覆盖。
    #[arg(long)]
    pub force: bool,

    /// 隐藏时使用的分块宽度 (1, 2, 4 或 8)。
    #[arg(short = 'k', long, env = CHUNK_WIDTH_ENV, default_value_t = ChunkWidth::default())]
    pub chunk_width: ChunkWidth,
}

/// 'capacity' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct CapacityArgs {
    /// 要估算容量的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 分块宽度 (1, 2, 4 或 8)。
    #[arg(short = 'k', long, env = CHUNK_WIDTH_ENV, default_value_t = ChunkWidth::default())]
    pub chunk_width: ChunkWidth,
}
