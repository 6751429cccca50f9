use std::io::Cursor;

use storycard::{AspectRatio, CardRenderer, StorycardError};

/// A gradient cover so crops, blurs and the palette all see real variation.
fn cover_png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_fn(width, height, |x, y| {
        let r = ((x * 255) / width.max(1)) as u8;
        let g = ((y * 255) / height.max(1)) as u8;
        image::Rgba([r, g, 180, 255])
    });
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn square_card_is_a_decodable_png_at_canvas_size() {
    let cover = cover_png(1200, 1600);
    let mut renderer = CardRenderer::new();
    let png = renderer
        .generate(&cover, "Hello world", AspectRatio::Square)
        .unwrap();

    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (1080, 1080));
    assert!(decoded.pixels().all(|p| p[3] == 255));
}

#[test]
fn story_and_wide_cards_match_their_canvases() {
    let cover = cover_png(800, 600);
    let mut renderer = CardRenderer::new();

    let story = renderer
        .render(&cover, "A quote for the story format", AspectRatio::Story)
        .unwrap();
    assert_eq!((story.width, story.height), (1080, 1920));
    assert_eq!(story.data.len(), 1080 * 1920 * 4);

    let wide = renderer
        .render(&cover, "A quote for the wide format", AspectRatio::Wide)
        .unwrap();
    assert_eq!((wide.width, wide.height), (1920, 960));
}

#[test]
fn rendering_is_deterministic() {
    let cover = cover_png(640, 800);
    let quote = "The same input must always produce\nthe same card.";
    let mut renderer = CardRenderer::new();

    let a = renderer.generate(&cover, quote, AspectRatio::Square).unwrap();
    let b = renderer.generate(&cover, quote, AspectRatio::Square).unwrap();
    assert_eq!(a, b);
}

#[test]
fn whitespace_quote_is_rejected() {
    let cover = cover_png(64, 64);
    let mut renderer = CardRenderer::new();
    let err = renderer
        .render(&cover, " \n\t ", AspectRatio::Story)
        .unwrap_err();
    assert!(matches!(err, StorycardError::MissingQuote));
    assert_eq!(err.to_string(), "quote text is required");
}

#[test]
fn empty_image_is_rejected() {
    let mut renderer = CardRenderer::new();
    let err = renderer
        .render(&[], "a quote", AspectRatio::Story)
        .unwrap_err();
    assert!(matches!(err, StorycardError::MissingImage));
    assert_eq!(err.to_string(), "cover image is required");
}

#[test]
fn undecodable_image_collapses_to_a_generic_failure() {
    let mut renderer = CardRenderer::new();
    let err = renderer
        .render(b"these bytes are not an image", "a quote", AspectRatio::Story)
        .unwrap_err();
    let StorycardError::Unprocessable(msg) = err else {
        panic!("expected Unprocessable, got {err}");
    };
    assert_eq!(msg, "failed to generate image");
}

#[test]
fn long_multiline_quote_still_renders() {
    let cover = cover_png(1000, 1000);
    let quote = "All the world's a stage, and all the men and women merely players. \
                 They have their exits and their entrances.\r\n\r\nAnd one man in his \
                 time plays many parts, his acts being seven ages."
        .repeat(2);
    let mut renderer = CardRenderer::new();
    let card = renderer.render(&cover, &quote, AspectRatio::Story).unwrap();
    assert_eq!((card.width, card.height), (1080, 1920));
}
