//! Tegra block-linear surface layout.
//!
//! The GPU stores textures as a grid of GOBs (64 bytes wide, 8 rows high),
//! stacked `block_height` GOBs tall. All sizes here are in format blocks: for
//! BCn textures one element is one 4x4 pixel block.

use themer_common::align_up;

const GOB_WIDTH: usize = 64;
const GOB_HEIGHT: usize = 8;
const GOB_SIZE: usize = GOB_WIDTH * GOB_HEIGHT;

/// Maximum block height, in GOBs.
pub const MAX_BLOCK_HEIGHT: usize = 16;

/// Block height, in GOBs, for a surface `height` blocks tall.
pub fn block_height(height: usize) -> usize {
    (height / GOB_HEIGHT)
        .next_power_of_two()
        .clamp(1, MAX_BLOCK_HEIGHT)
}

/// Block height for a mipmap `height` blocks tall, given the base level's.
///
/// Smaller mipmaps halve the block height until a block is no taller than
/// twice the surface.
pub fn mip_block_height(height: usize, base_block_height: usize) -> usize {
    let mut block_height = base_block_height;
    while block_height > 1 && height <= (block_height / 2) * GOB_HEIGHT {
        block_height /= 2;
    }
    block_height
}

/// Size of a swizzled surface including padding to whole blocks of GOBs.
pub fn swizzled_size(
    width: usize,
    height: usize,
    bytes_per_element: usize,
    block_height: usize,
) -> usize {
    let width_in_gobs = (width * bytes_per_element).div_ceil(GOB_WIDTH);
    width_in_gobs * GOB_WIDTH * align_up(height, GOB_HEIGHT * block_height)
}

/// Byte offset of element `(x, y)` in a block-linear surface.
pub fn block_linear_offset(
    x: usize,
    y: usize,
    width: usize,
    bytes_per_element: usize,
    block_height: usize,
) -> usize {
    let width_in_gobs = (width * bytes_per_element).div_ceil(GOB_WIDTH);
    let block_size = GOB_SIZE * block_height;
    let xb = x * bytes_per_element;

    let gob = (y / (GOB_HEIGHT * block_height)) * block_size * width_in_gobs
        + (xb / GOB_WIDTH) * block_size
        + (y % (GOB_HEIGHT * block_height) / GOB_HEIGHT) * GOB_SIZE;

    gob + ((xb % 64) / 32) * 256
        + ((y % 8) / 2) * 64
        + ((xb % 32) / 16) * 32
        + (y % 2) * 16
        + (xb % 16)
}

fn copy_block_linear(
    src: &[u8],
    dst: &mut [u8],
    width: usize,
    height: usize,
    bytes_per_element: usize,
    block_height: usize,
    to_swizzled: bool,
) {
    for y in 0..height {
        for x in 0..width {
            let linear = (y * width + x) * bytes_per_element;
            let swizzled = block_linear_offset(x, y, width, bytes_per_element, block_height);
            let (from, to) = if to_swizzled {
                (linear, swizzled)
            } else {
                (swizzled, linear)
            };

            if let (Some(s), Some(d)) = (
                src.get(from..from + bytes_per_element),
                dst.get_mut(to..to + bytes_per_element),
            ) {
                d.copy_from_slice(s);
            }
        }
    }
}

/// Convert a linear surface to block-linear layout.
///
/// Elements missing from a short `data` buffer are left zeroed.
pub fn swizzle_block_linear(
    data: &[u8],
    width: usize,
    height: usize,
    bytes_per_element: usize,
    block_height: usize,
) -> Vec<u8> {
    let mut out = vec![0; swizzled_size(width, height, bytes_per_element, block_height)];
    copy_block_linear(
        data,
        &mut out,
        width,
        height,
        bytes_per_element,
        block_height,
        true,
    );
    out
}

/// Convert a block-linear surface back to linear layout.
pub fn deswizzle_block_linear(
    data: &[u8],
    width: usize,
    height: usize,
    bytes_per_element: usize,
    block_height: usize,
) -> Vec<u8> {
    let mut out = vec![0; width * height * bytes_per_element];
    copy_block_linear(
        data,
        &mut out,
        width,
        height,
        bytes_per_element,
        block_height,
        false,
    );
    out
}
