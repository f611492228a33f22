// End-to-end checks: encoded upload bytes in, PNG variants out.
use std::io::Cursor;

use brand_image_prep::image_prep::{
    Bitmap, ImagePrep, KeyingSpec, LogoOptions, PrepConfig, PrepError, PrepOutput, PrepRequest,
    Rgb, VariantKind,
};
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgba, RgbaImage};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn encode(image: RgbaImage, format: ImageFormat) -> Vec<u8> {
    let image = match format {
        // JPEG 不支持 alpha 通道
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(image).to_rgb8()),
        _ => DynamicImage::ImageRgba8(image),
    };
    let mut cursor = Cursor::new(Vec::new());
    image
        .write_to(&mut cursor, format)
        .expect("failed to encode test image");
    cursor.into_inner()
}

fn decode_rgba(bytes: &[u8]) -> RgbaImage {
    image::load_from_memory(bytes)
        .expect("output should be a valid image")
        .to_rgba8()
}

/// 红色方块位于白色背景中央的 Logo。
fn logo_on_white(width: u32, height: u32) -> RgbaImage {
    ImageBuffer::from_fn(width, height, |x, y| {
        let inside = x >= width / 4 && x < width * 3 / 4 && y >= height / 4 && y < height * 3 / 4;
        if inside {
            Rgba([220, 20, 20, 255])
        } else {
            Rgba([255, 255, 255, 255])
        }
    })
}

#[test]
fn logo_upload_produces_three_png_variants() {
    init_logger();
    let prep = ImagePrep::new(PrepConfig::default()).expect("prep init failed");
    let png = encode(logo_on_white(800, 200), ImageFormat::Png);

    let output = prep
        .prepare(&png, PrepRequest::logo(LogoOptions::default()))
        .expect("prepare failed");

    let PrepOutput::Logo(variants) = output else {
        panic!("expected logo output");
    };

    let expected = [
        (VariantKind::RectangularLogo, (800, 320)),
        (VariantKind::SquareLogo, (800, 800)),
        (VariantKind::Favicon, (64, 64)),
    ];
    for (image, (kind, dims)) in variants.iter().zip(expected) {
        assert_eq!(image.variant(), kind);
        assert_eq!(image.format().mime_type(), "image/png");
        assert_eq!(decode_rgba(image.bytes()).dimensions(), dims);
    }
}

#[test]
fn keyed_transparent_logo_has_transparent_padding_and_background() {
    init_logger();
    let prep = ImagePrep::new(PrepConfig::default()).expect("prep init failed");
    let png = encode(logo_on_white(200, 200), ImageFormat::Png);
    let bitmap = prep.decode(&png).expect("decode failed");

    let spec = KeyingSpec::sampled_from_corner(&bitmap, 30.0).expect("spec");
    let keyed = prep.remove_background(bitmap, &spec);
    assert_eq!(keyed.dimensions(), (200, 200));

    let variants = prep
        .process_logo_variants(
            &keyed,
            LogoOptions {
                use_transparent_background: true,
            },
        )
        .expect("variants failed");

    let rect = decode_rgba(variants.rectangular.bytes());
    assert_eq!(rect.dimensions(), (500, 200));
    // 补边区域
    assert_eq!(rect.get_pixel(0, 0).0[3], 0);
    // 源图中被抠除的白色背景
    assert_eq!(rect.get_pixel(150 + 10, 10).0[3], 0);
    // 前景保持不变
    assert_eq!(rect.get_pixel(150 + 100, 100).0, [220, 20, 20, 255]);
}

#[test]
fn headshot_from_jpeg_is_padded_to_minimum_on_white() {
    init_logger();
    let prep = ImagePrep::new(PrepConfig::default()).expect("prep init failed");
    let jpeg = encode(
        RgbaImage::from_pixel(50, 80, Rgba([30, 30, 30, 255])),
        ImageFormat::Jpeg,
    );

    let output = prep
        .prepare(&jpeg, PrepRequest::headshot())
        .expect("prepare failed");

    let PrepOutput::Headshot(headshot) = output else {
        panic!("expected headshot output");
    };
    let decoded = decode_rgba(headshot.bytes());

    assert_eq!(decoded.dimensions(), (292, 400));
    assert_eq!(decoded.get_pixel(0, 0).0, [255, 255, 255, 255]);
    assert_eq!(decoded.get_pixel(291, 399).0, [255, 255, 255, 255]);
    assert_eq!(headshot.fit().offset_x, 121);
    assert_eq!(headshot.fit().offset_y, 160);
}

#[test]
fn favicon_scales_extreme_aspect_source() {
    init_logger();
    let prep = ImagePrep::new(PrepConfig::default()).expect("prep init failed");
    let bitmap = Bitmap::from_image(RgbaImage::from_pixel(1000, 10, Rgba([0, 0, 0, 255])))
        .expect("bitmap init failed");

    let variants = prep
        .process_logo_variants(&bitmap, LogoOptions::default())
        .expect("variants failed");

    let fit = variants.favicon.fit();
    assert_eq!((fit.content_width, fit.content_height), (64, 1));
    assert_eq!((fit.offset_x, fit.offset_y), (0, 31));
    assert_eq!(variants.favicon.file_name(), "favicon.png");

    let decoded = decode_rgba(variants.favicon.bytes());
    assert_eq!(decoded.get_pixel(0, 0).0, [255, 255, 255, 255]);
    assert_eq!(decoded.get_pixel(0, 63).0, [255, 255, 255, 255]);
}

#[test]
fn custom_fill_color_from_json_config() {
    init_logger();
    let config = PrepConfig::from_json_str(
        r#"{ "fill_color": { "r": 12, "g": 34, "b": 56 }, "png_compression": "fast" }"#,
    )
    .expect("config should parse");
    let prep = ImagePrep::new(config).expect("prep init failed");
    let bitmap = Bitmap::from_image(RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255])))
        .expect("bitmap init failed");

    let headshot = prep.process_headshot(&bitmap).expect("headshot failed");

    assert_eq!(
        decode_rgba(headshot.bytes()).get_pixel(0, 0).0,
        [12, 34, 56, 255]
    );
    assert_eq!(prep.config().fill_color, Rgb::new(12, 34, 56));
}

#[test]
fn uploads_run_independently_on_separate_threads() {
    init_logger();
    let prep = std::sync::Arc::new(ImagePrep::new(PrepConfig::default()).expect("prep init failed"));

    let handles: Vec<_> = [(120, 40), (40, 120), (64, 64)]
        .into_iter()
        .map(|(width, height)| {
            let prep = std::sync::Arc::clone(&prep);
            std::thread::spawn(move || {
                let png = encode(logo_on_white(width, height), ImageFormat::Png);
                prep.prepare(&png, PrepRequest::logo(LogoOptions::default()))
            })
        })
        .collect();

    for handle in handles {
        let output = handle.join().expect("worker panicked");
        assert!(matches!(output, Ok(PrepOutput::Logo(_))));
    }
}

#[test]
fn non_image_upload_is_rejected() {
    init_logger();
    let prep = ImagePrep::new(PrepConfig::default()).expect("prep init failed");

    let result = prep.prepare(b"%PDF-1.7 definitely not a picture", PrepRequest::headshot());

    assert!(matches!(result, Err(PrepError::InvalidFormat(_))));
}
