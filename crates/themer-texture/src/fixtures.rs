//! Synthetic DDS and BNTX files for tests.

use themer_common::{align_up, BinaryWriter, Endian};

use crate::dds::{mipmap_size, DdsHeaderDxt10, DDS_MAGIC};
use crate::swizzle::{block_height, swizzled_size};
use crate::TextureFormat;

/// Build a DDS file. Unorm formats use a legacy four-cc, sRGB ones a DX10
/// header. Pixel data counts up from zero.
pub fn dds(format: TextureFormat, width: u32, height: u32, mips: u32) -> Vec<u8> {
    let mut w = BinaryWriter::new(Endian::Little);
    w.write_bytes(DDS_MAGIC);
    w.write_u32(124);
    w.write_u32(0x000A_1007); // caps, height, width, pixel format, mipmap count, linear size
    w.write_u32(height);
    w.write_u32(width);
    w.write_u32(mipmap_size(width, height, format.block_size()) as u32);
    w.write_u32(0);
    w.write_u32(mips);
    w.write_bytes(&[0; 44]);

    let dxgi = match format {
        TextureFormat::Bc1Unorm => None,
        TextureFormat::Bc3Unorm => None,
        TextureFormat::Bc1Srgb => Some(DdsHeaderDxt10::BC1_UNORM_SRGB),
        TextureFormat::Bc3Srgb => Some(DdsHeaderDxt10::BC3_UNORM_SRGB),
    };
    let four_cc = match (format, dxgi) {
        (_, Some(_)) => b"DX10",
        (TextureFormat::Bc1Unorm, None) => b"DXT1",
        _ => b"DXT5",
    };

    // pixel format
    w.write_u32(32);
    w.write_u32(0x4); // four-cc
    w.write_bytes(four_cc);
    w.write_bytes(&[0; 20]);

    w.write_u32(0x1000); // texture
    w.write_bytes(&[0; 16]);

    if let Some(dxgi) = dxgi {
        w.write_u32(dxgi);
        w.write_u32(3); // 2D
        w.write_u32(0);
        w.write_u32(1);
        w.write_u32(0);
    }

    let total: usize = (0..mips.max(1))
        .map(|level| {
            mipmap_size(
                (width >> level).max(1),
                (height >> level).max(1),
                format.block_size(),
            )
        })
        .sum();
    for i in 0..total {
        w.write_u8(i as u8);
    }

    w.into_inner()
}

/// Build a BNTX holding single-mipmap BC1 textures `(name, width, height)`.
///
/// Texture `i` is filled with the byte `i + 1`. The relocation table has a
/// section for the descriptors and one for the data block.
pub fn bntx(endian: Endian, textures: &[(&str, u32, u32)]) -> Vec<u8> {
    let mut w = BinaryWriter::new(endian);

    // file header
    w.write_bytes(b"BNTX");
    w.write_u32(0);
    w.write_u32(0x0004_0000);
    w.write_bom();
    w.write_u8(0x0C);
    w.write_u8(0x40);
    w.write_u32(0);
    w.write_u16(0);
    w.write_u16(0x20);
    w.write_u32(0); // relocation table
    w.write_u32(0); // file size

    // NX header
    w.write_bytes(b"NX  ");
    w.write_u32(textures.len() as u32);
    w.write_u64(0x48);
    w.write_u64(0); // data block
    w.write_u64(0);
    w.write_u32(0);
    w.write_u32(0);

    let info_array = w.position();
    for _ in textures {
        w.write_u64(0);
    }

    let mut names = Vec::new();
    for (name, _, _) in textures {
        w.align(8, 0);
        names.push(w.position());
        w.write_u16(name.len() as u16);
        w.write_cstring(name);
    }

    let mut mip_arrays = Vec::new();
    let mut sizes = Vec::new();
    for (i, &(_, width, height)) in textures.iter().enumerate() {
        let blocks_x = (width as usize).div_ceil(4);
        let blocks_y = (height as usize).div_ceil(4);
        let bh = block_height(blocks_y);
        let size = swizzled_size(blocks_x, blocks_y, 8, bh);
        sizes.push(size);

        w.align(8, 0);
        let info = w.position();
        w.write_u64_at(info_array + i * 8, info as u64).unwrap();

        w.write_bytes(b"BRTI");
        w.write_u32(0);
        w.write_u32(0xA0);
        w.write_u32(0);
        w.write_u8(1);
        w.write_u8(2);
        w.write_u16(0); // tile mode
        w.write_u16(0);
        w.write_u16(1); // mipmaps
        w.write_u32(1);
        w.write_u32(TextureFormat::Bc1Unorm.bntx_format());
        w.write_u32(0x20);
        w.write_u32(width);
        w.write_u32(height);
        w.write_u32(1);
        w.write_u32(1);
        w.write_u32(bh.trailing_zeros());
        w.write_u32(0x0001_0007);
        w.write_bytes(&[0; 20]);
        w.write_u32(size as u32);
        w.write_u32(0x200);
        w.write_u32(0x0504_0302);
        w.write_u32(1);
        w.write_u64(names[i] as u64);
        w.write_u64(0x20);
        w.write_u64((info + 0xA0) as u64); // mipmap offsets follow the descriptor
        w.write_bytes(&[0; 0x28]);

        mip_arrays.push(w.position());
        w.write_u64(0);
    }

    // data block, with texture data starting on a 0x200 boundary
    let brtd = align_up(w.position() + 0x10, 0x200) - 0x10;
    w.pad_to(brtd);
    w.write_u64_at(0x30, brtd as u64).unwrap();
    w.write_bytes(b"BRTD");
    w.write_u32(0);
    w.write_u64(0);

    for (i, size) in sizes.iter().enumerate() {
        w.align(0x200, 0);
        w.write_u64_at(mip_arrays[i], w.position() as u64).unwrap();
        w.write_bytes(&vec![i as u8 + 1; *size]);
    }
    let brtd_size = w.position() - brtd;
    w.write_u64_at(brtd + 8, brtd_size as u64).unwrap();

    w.align(8, 0);
    let rlt = w.position();
    w.write_u32_at(0x18, rlt as u32).unwrap();
    w.write_bytes(b"_RLT");
    w.write_u32(rlt as u32);
    w.write_u32(2);
    w.write_u32(0);
    for (position, size, entry) in [(0, brtd, 0), (brtd, brtd_size, 1)] {
        w.write_u64(0);
        w.write_u32(position as u32);
        w.write_u32(size as u32);
        w.write_u32(entry);
        w.write_u32(1);
    }
    // NX info array pointer, data block pointer
    for position in [0x28u32, 0x30] {
        w.write_u32(position);
        w.write_u16(1);
        w.write_u8(1);
        w.write_u8(0);
    }

    let file_size = w.position();
    w.write_u32_at(0x1C, file_size as u32).unwrap();
    w.into_inner()
}
