/// 长度头占用的字节数。
/// 负载长度以 `u32` 大端序写在比特流最前面，紧接着就是负载本身。
pub const HEADER_SIZE: usize = 4;

/// 每个像素参与隐写的颜色通道数 (R, G, B，不使用 alpha)。
pub const CHANNELS_PER_PIXEL: usize = 3;

/// 命令行未指定时使用的分块宽度 (每个通道隐藏的低位比特数)。
pub const DEFAULT_CHUNK_WIDTH: u8 = 4;

/// 每处理这么多个通道位置汇报一次进度。
pub const PROGRESS_INTERVAL: usize = 100_000;

/// 可以覆盖 `--chunk-width` 默认值的环境变量。
pub const CHUNK_WIDTH_ENV: &str = "LSB_PACK_CHUNK_WIDTH";

/// 未指定输出路径时，隐写结果图像的文件名前缀。
pub const HIDDEN_IMAGE_PREFIX: &str = "doctored_";

/// 隐写结果图像的默认扩展名 (无损格式)。
pub const HIDDEN_IMAGE_EXTENSION: &str = "png";

/// 未指定输出路径时，恢复出的负载文件名前缀。
pub const RECOVERED_FILE_PREFIX: &str = "recovered_";

/// 恢复出的负载文件的默认扩展名。
pub const RECOVERED_FILE_EXTENSION: &str = "bin";
