//! # 载体模块
//!
//! 定义隐写核心所需的载体抽象：一个可按坐标随机读写颜色通道值的像素网格，
//! 以及按光栅顺序 (先行后列，通道最内层) 单调前进的遍历游标。

use crate::constants::CHANNELS_PER_PIXEL;
use image::RgbImage;

/// 可寻址的像素通道网格。每个像素有 3 个 8 位通道。
///
/// 坐标越界属于调用者的编程错误；[`RasterCursor`] 产出的位置总在范围内。
pub trait ChannelCarrier {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn get_channel(&self, x: u32, y: u32, channel: usize) -> u8;

    fn set_channel(&mut self, x: u32, y: u32, channel: usize, value: u8);

    /// 通道位置总数，即 `width * height * 3`。
    fn channel_count(&self) -> usize {
        self.width() as usize * self.height() as usize * CHANNELS_PER_PIXEL
    }
}

impl ChannelCarrier for RgbImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn get_channel(&self, x: u32, y: u32, channel: usize) -> u8 {
        self.get_pixel(x, y).0[channel]
    }

    fn set_channel(&mut self, x: u32, y: u32, channel: usize, value: u8) {
        self.get_pixel_mut(x, y).0[channel] = value;
    }
}

/// 载体中的一个通道位置。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: u32,
    pub y: u32,
    pub channel: usize,
}

impl Position {
    pub fn read<C: ChannelCarrier + ?Sized>(self, carrier: &C) -> u8 {
        carrier.get_channel(self.x, self.y, self.channel)
    }

    pub fn write<C: ChannelCarrier + ?Sized>(self, carrier: &mut C, value: u8) {
        carrier.set_channel(self.x, self.y, self.channel, value);
    }
}

/// 光栅顺序的通道游标。
///
/// 进位顺序为 通道 → x → y；当 y 到达图像高度时终止，不会回绕。
/// 游标只记录位置，不借用载体，因此编码时可以一边遍历一边修改载体。
#[derive(Debug, Clone)]
pub struct RasterCursor {
    width: u32,
    height: u32,
    next: Option<Position>,
    consumed: usize,
}

impl RasterCursor {
    pub fn new(width: u32, height: u32) -> Self {
        let next = (width > 0 && height > 0).then_some(Position {
            x: 0,
            y: 0,
            channel: 0,
        });
        Self {
            width,
            height,
            next,
            consumed: 0,
        }
    }

    pub fn over<C: ChannelCarrier + ?Sized>(carrier: &C) -> Self {
        Self::new(carrier.width(), carrier.height())
    }

    pub fn total(&self) -> usize {
        self.width as usize * self.height as usize * CHANNELS_PER_PIXEL
    }

    /// 已经产出的位置数。
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// 尚未产出的位置数。
    pub fn remaining(&self) -> usize {
        self.total() - self.consumed
    }

    fn successor(&self, current: Position) -> Option<Position> {
        let mut next = current;
        next.channel += 1;
        if next.channel < CHANNELS_PER_PIXEL {
            return Some(next);
        }

        next.channel = 0;
        next.x += 1;
        if next.x < self.width {
            return Some(next);
        }

        next.x = 0;
        next.y += 1;
        (next.y < self.height).then_some(next)
    }
}

impl Iterator for RasterCursor {
    type Item = Position;

    fn next(&mut self) -> Option<Position> {
        let current = self.next?;
        self.next = self.successor(current);
        self.consumed += 1;
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.remaining();
        (left, Some(left))
    }
}

impl ExactSizeIterator for RasterCursor {}
