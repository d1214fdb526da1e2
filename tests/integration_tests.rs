use anyhow::Ok;
use image::{ImageBuffer, Rgba, RgbImage};
use lsb_pack::{
    ChunkWidth,
    cli::{CapacityArgs, HideArgs, RecoverArgs},
    handler::{handle_capacity, handle_hide, handle_recover},
};
use rand::RngCore;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// 一个辅助函数，用于创建一个带有随机像素的测试图像
fn create_test_image(path: &Path, width: u32, height: u32) {
    let mut img_buf = ImageBuffer::new(width, height);
    let mut raw_pixels = vec![0u8; (width * height * 4) as usize];
    rand::rng().fill_bytes(&mut raw_pixels);

    img_buf
        .pixels_mut()
        .zip(raw_pixels.chunks_exact(4))
        .for_each(|(pixel, chunk)| {
            *pixel = Rgba([chunk[0], chunk[1], chunk[2], 255]);
        });

    img_buf.save(path).expect("Failed to create test image.");
}

/// 一个辅助函数，用于生成随机的二进制负载
fn random_payload(len: usize) -> Vec<u8> {
    let mut data = vec![0u8; len];
    rand::rng().fill_bytes(&mut data);
    data
}

fn chunk_width(k: u8) -> ChunkWidth {
    ChunkWidth::new(k).expect("valid chunk width")
}

/// 验证从隐藏到恢复的完整流程
#[test]
fn test_handle_hide_and_recover_integration() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let original_image_path = dir.path().join("original.png");
    let hidden_image_path = dir.path().join("hidden.png");
    let source_data_path = dir.path().join("source.bin");
    let recovered_data_path = dir.path().join("recovered.bin");

    create_test_image(&original_image_path, 100, 100);
    let original_data = random_payload(2_000);
    fs::write(&source_data_path, &original_data)?;

    // 2. 测试 handle_hide
    let hide_args = HideArgs {
        image: original_image_path.clone(),
        data: source_data_path.clone(),
        dest: Some(hidden_image_path.clone()),
        force: false,
        chunk_width: chunk_width(2),
    };
    handle_hide(hide_args)?;
    assert!(
        hidden_image_path.exists(),
        "Hidden image should be created."
    );

    // 3. 测试 handle_recover
    let recover_args = RecoverArgs {
        image: hidden_image_path.clone(),
        out: Some(recovered_data_path.clone()),
        force: false,
        chunk_width: chunk_width(2),
    };
    handle_recover(recover_args)?;
    assert!(
        recovered_data_path.exists(),
        "Recovered file should be created."
    );

    // 4. 验证结果
    let recovered_data = fs::read(&recovered_data_path)?;
    assert_eq!(
        original_data, recovered_data,
        "Recovered data must match the original."
    );

    Ok(())
}

/// 验证每一种分块宽度都能完整往返，且隐写只改变通道的低位
#[test]
fn test_round_trip_every_chunk_width() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let original_image_path = dir.path().join("original.png");
    let source_data_path = dir.path().join("source.txt");
    create_test_image(&original_image_path, 64, 64);

    let text = "Chunked LSB round trip. 分块往返测试。";
    fs::write(&source_data_path, text)?;
    let original = image::open(&original_image_path)?.to_rgb8();

    for k in ChunkWidth::all() {
        let hidden_image_path = dir.path().join(format!("hidden_{k}.png"));
        let recovered_path = dir.path().join(format!("recovered_{k}.txt"));

        handle_hide(HideArgs {
            image: original_image_path.clone(),
            data: source_data_path.clone(),
            dest: Some(hidden_image_path.clone()),
            force: false,
            chunk_width: k,
        })?;
        handle_recover(RecoverArgs {
            image: hidden_image_path.clone(),
            out: Some(recovered_path.clone()),
            force: false,
            chunk_width: k,
        })?;

        assert_eq!(fs::read_to_string(&recovered_path)?, text, "chunk width {k}");

        let hidden: RgbImage = image::open(&hidden_image_path)?.to_rgb8();
        let keep = k.clear_mask();
        assert!(
            original
                .as_raw()
                .iter()
                .zip(hidden.as_raw())
                .all(|(a, b)| a & keep == b & keep),
            "High bits must be preserved with chunk width {k}"
        );
    }

    Ok(())
}

/// 验证当用户不提供输出路径时，是否能正确生成默认路径并完成操作
#[test]
fn test_handle_hide_and_recover_with_defaults() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let original_image_path = dir.path().join("original.png");
    let source_data_path = dir.path().join("source.txt");

    create_test_image(&original_image_path, 100, 100);
    let original_text = "Testing default path generation. 测试默认路径生成。";
    fs::write(&source_data_path, original_text)?;

    // 2. 测试 handle_hide，不提供 dest 路径
    let hide_args = HideArgs {
        image: original_image_path.clone(),
        data: source_data_path.clone(),
        dest: None, // 关键：测试 None 的情况
        force: false,
        chunk_width: ChunkWidth::default(),
    };
    handle_hide(hide_args)?;

    // 验证默认的隐藏图像文件是否已创建
    let expected_hidden_path = dir.path().join("doctored_original.png");
    assert!(
        expected_hidden_path.exists(),
        "Default hidden image should be created at: {:?}",
        expected_hidden_path
    );

    // 3. 测试 handle_recover，不提供输出路径
    let recover_args = RecoverArgs {
        image: expected_hidden_path, // 使用上一步生成的默认文件
        out: None,                   // 关键：测试 None 的情况
        force: false,
        chunk_width: ChunkWidth::default(),
    };
    handle_recover(recover_args)?;

    // 验证默认的恢复文件是否已创建
    let expected_recovered_path = dir.path().join("recovered_doctored_original.bin");
    assert!(
        expected_recovered_path.exists(),
        "Default recovered file should be created at: {:?}",
        expected_recovered_path
    );

    // 4. 验证结果
    let recovered_text = fs::read_to_string(&expected_recovered_path)?;
    assert_eq!(
        original_text, recovered_text,
        "Recovered text from default file must match the original."
    );

    Ok(())
}

/// 验证覆盖保护机制以及 `--force` 标志是否按预期工作
#[test]
fn test_overwrite_protection_and_force_flag() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let image_path = dir.path().join("image.png");
    let data_path = dir.path().join("data.txt");
    let dest_path = dir.path().join("dest.png");

    create_test_image(&image_path, 50, 50);
    fs::write(&data_path, "some text")?;

    // 2. 场景一：测试覆盖保护
    // 先创建一个同名的目标文件，模拟“文件已存在”的场景
    fs::write(&dest_path, "this is a dummy file to be overwritten")?;
    assert!(dest_path.exists());

    // 构建参数，不使用 --force
    let hide_args_no_force = HideArgs {
        image: image_path.clone(),
        data: data_path.clone(),
        dest: Some(dest_path.clone()),
        force: false,
        chunk_width: ChunkWidth::default(),
    };

    // 执行并断言操作会失败
    let result = handle_hide(hide_args_no_force);
    assert!(
        result.is_err(),
        "Execution should fail without --force when file exists."
    );
    if let Err(e) = result {
        assert!(e.to_string().contains("Output file already exists"));
    }

    // 3. 场景二：测试强制覆盖
    // 构建参数，这次使用 --force
    let hide_args_with_force = HideArgs {
        image: image_path.clone(),
        data: data_path.clone(),
        dest: Some(dest_path.clone()),
        force: true,
        chunk_width: ChunkWidth::default(),
    };

    // 执行并断言操作会成功
    let result = handle_hide(hide_args_with_force);
    assert!(
        result.is_ok(),
        "Execution should succeed with --force when file exists."
    );

    // 验证文件确实被覆盖（内容不再是 "this is a dummy file..."）
    let dummy_content = fs::read(&dest_path)?;
    assert_ne!(dummy_content, b"this is a dummy file to be overwritten");

    Ok(())
}

/// 验证空间不足时的错误处理
#[test]
fn test_handle_hide_not_enough_space() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let image_path = dir.path().join("small.png");
    let data_path = dir.path().join("large.txt");
    let dest_path = dir.path().join("dest.png");

    // 创建一个非常小的图片：10x10，k = 4 时只能容纳 150 字节
    create_test_image(&image_path, 10, 10);
    // 创建一个非常大的文件
    fs::write(&data_path, "a".repeat(5000))?;

    // 2. 执行并断言错误
    let hide_args = HideArgs {
        image: image_path,
        data: data_path,
        dest: Some(dest_path.clone()),
        force: false,
        chunk_width: ChunkWidth::default(),
    };
    let result = handle_hide(hide_args);

    assert!(result.is_err());
    if let Err(e) = result {
        assert!(e.to_string().contains("Not enough space"));
    }
    assert!(!dest_path.exists(), "No image should be written on failure.");

    Ok(())
}

/// 验证使用错误的分块宽度恢复时会报错，而不是输出垃圾数据
#[test]
fn test_recover_with_wrong_chunk_width_fails() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("image.png");
    let data_path = dir.path().join("data.txt");
    let hidden_path = dir.path().join("hidden.png");
    let out_path = dir.path().join("out.bin");

    // 纯白图像：用 k = 1 隐藏后，以 k = 8 读取的长度头必然远超容量
    RgbImage::from_pixel(40, 40, image::Rgb([255, 255, 255])).save(&image_path)?;
    fs::write(&data_path, "hello")?;

    handle_hide(HideArgs {
        image: image_path,
        data: data_path,
        dest: Some(hidden_path.clone()),
        force: false,
        chunk_width: chunk_width(1),
    })?;

    let result = handle_recover(RecoverArgs {
        image: hidden_path,
        out: Some(out_path.clone()),
        force: false,
        chunk_width: chunk_width(8),
    });

    assert!(result.is_err());
    if let Err(e) = result {
        assert!(e.to_string().contains("Failed to recover hidden data"));
        assert!(format!("{e:#}").contains("corrupt header"));
    }
    assert!(!out_path.exists());

    Ok(())
}

/// 验证输出目录不存在时会被自动创建
#[test]
fn test_hide_creates_missing_output_directory() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("image.png");
    let data_path = dir.path().join("data.bin");
    let dest_path = dir.path().join("nested").join("deeper").join("out.png");

    create_test_image(&image_path, 30, 30);
    fs::write(&data_path, random_payload(64))?;

    handle_hide(HideArgs {
        image: image_path,
        data: data_path,
        dest: Some(dest_path.clone()),
        force: false,
        chunk_width: ChunkWidth::default(),
    })?;

    assert!(dest_path.exists());
    Ok(())
}

/// 验证容量命令可以处理正常图像，并对不存在的文件报错
#[test]
fn test_handle_capacity() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("image.png");
    create_test_image(&image_path, 20, 20);

    handle_capacity(CapacityArgs {
        image: image_path,
        chunk_width: chunk_width(1),
    })?;

    let missing = handle_capacity(CapacityArgs {
        image: dir.path().join("missing.png"),
        chunk_width: chunk_width(1),
    });
    assert!(missing.is_err());
    if let Err(e) = missing {
        assert!(e.to_string().contains("Unable to read image file"));
    }

    Ok(())
}
