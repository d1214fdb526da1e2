//! # 命令处理逻辑模块
//!
//! 包含处理 `hide`、`recover` 和 `capacity` 子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、调用核心隐写算法以及向用户报告结果。

use crate::capacity::{capacity, format_capacity, max_payload_len};
use crate::cli::{CapacityArgs, HideArgs, RecoverArgs};
use crate::constants::{
    HEADER_SIZE, HIDDEN_IMAGE_EXTENSION, HIDDEN_IMAGE_PREFIX, RECOVERED_FILE_EXTENSION,
    RECOVERED_FILE_PREFIX,
};
use crate::progress::ConsoleProgress;
use crate::steganography::{decode_with_progress, encode_with_progress};
use anyhow::{Context, Result};
use colored::Colorize;
use image::RgbImage;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

/// 处理 'Hide' 命令的执行逻辑。
///
/// 负责读取图像和数据文件、检查隐写空间是否足够、调用隐写核心函数写入长度头和数据，
/// 最后将结果写入目标图像文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径和分块宽度的 `HideArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取输入的图像或数据文件。
/// * 目标文件已存在且未指定 `--force`。
/// * 图像没有足够的空间来隐藏数据。
/// * 无法写入到目标图像文件。
pub fn handle_hide(args: HideArgs) -> Result<()> {
    let dest = args.dest.clone().unwrap_or_else(|| {
        default_output_path(&args.image, HIDDEN_IMAGE_PREFIX, HIDDEN_IMAGE_EXTENSION)
    });
    ensure_writable(&dest, args.force)?;

    let mut picture = load_image(&args.image)?;

    let data = fs::read(&args.data).with_context(|| {
        format!(
            "Unable to read data file: {}",
            args.data.to_string_lossy().red().bold()
        )
    })?;

    let (width, height) = picture.dimensions();
    let available_space = max_payload_len(width, height, args.chunk_width);
    let required_space = data.len() as u64;
    debug!(
        "{}x{} carrier, chunk width {}, {} of {} bytes requested",
        width, height, args.chunk_width, required_space, available_space
    );

    anyhow::ensure!(
        available_space >= required_space,
        "Not enough space in the image to hide the data. \nRequired: {}, Available: {} (chunk width {})",
        format_capacity(required_space).red().bold(),
        format_capacity(available_space).green().bold(),
        args.chunk_width.to_string().yellow()
    );

    info!("Hiding {} bytes with a chunk width of {}", data.len(), args.chunk_width);
    encode_with_progress(
        &mut picture,
        &data,
        args.chunk_width,
        &mut ConsoleProgress::new("Encoded"),
    )
    .with_context(|| {
        format!(
            "Failed to hide the data in the image: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    create_parent_dir(&dest)?;
    picture.save(&dest).with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The data has been successfully hidden and saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Recover' 命令的执行逻辑。
///
/// 负责读取经过隐写的图像文件、调用恢复核心函数获取长度头和数据，
/// 最后将恢复的内容写入目标文件。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取输入的图像文件。
/// * 目标文件已存在且未指定 `--force`。
/// * 图像中没有隐藏数据、数据已损坏，或分块宽度与隐藏时不一致。
/// * 无法写入到目标文件。
pub fn handle_recover(args: RecoverArgs) -> Result<()> {
    let out = args.out.clone().unwrap_or_else(|| {
        default_output_path(&args.image, RECOVERED_FILE_PREFIX, RECOVERED_FILE_EXTENSION)
    });
    ensure_writable(&out, args.force)?;

    let picture = load_image(&args.image)?;

    info!("Recovering data with a chunk width of {}", args.chunk_width);
    let data = decode_with_progress(
        &picture,
        args.chunk_width,
        &mut ConsoleProgress::new("Decoded"),
    )
    .with_context(|| {
        format!(
            "Failed to recover hidden data from '{}'. \nThe image may not contain hidden data, is corrupted, or was hidden with a chunk width other than {}.",
            args.image.to_string_lossy().red().bold(),
            args.chunk_width.to_string().yellow()
        )
    })?;

    create_parent_dir(&out)?;
    fs::write(&out, &data).with_context(|| {
        format!(
            "Unable to write to target file: {}",
            out.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "{} bytes have been successfully recovered and saved: {}",
        data.len(),
        out.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 处理 'Capacity' 命令的执行逻辑：打印图像在给定分块宽度下的容量。
///
/// # Errors
///
/// 无法读取或解码图像文件时返回错误。
pub fn handle_capacity(args: CapacityArgs) -> Result<()> {
    let picture = load_image(&args.image)?;
    let (width, height) = picture.dimensions();
    let total = capacity(width, height, args.chunk_width);

    println!(
        "This image has a capacity of {} with a chunk size of {}",
        format_capacity(total).yellow().bold(),
        args.chunk_width.to_string().yellow().bold()
    );
    println!(
        "Largest file that fits after the {}-byte header: {}",
        HEADER_SIZE,
        format_capacity(max_payload_len(width, height, args.chunk_width)).green()
    );

    Ok(())
}

/// 读取图像并转换为 8 位 RGB，alpha 通道不参与隐写。
fn load_image(path: &Path) -> Result<RgbImage> {
    let picture = image::open(path).with_context(|| {
        format!(
            "Unable to read image file: {}",
            path.to_string_lossy().red().bold()
        )
    })?;
    Ok(picture.to_rgb8())
}

/// 根据输入文件生成默认输出路径，例如 `dir/cat.png` -> `dir/doctored_cat.png`。
pub fn default_output_path(input: &Path, prefix: &str, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{prefix}{stem}.{extension}"))
}

fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}\nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

fn create_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir).with_context(|| {
            format!(
                "Unable to create output directory: {}",
                dir.to_string_lossy().red().bold()
            )
        }),
        _ => Ok(()),
    }
}
