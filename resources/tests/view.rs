use pazzers_resources::{
    BufferView, BufferViewMut, Canvas, PixelBuffer, PixelFormat, Rect, ResourceError,
};

fn numbered(width: u32, height: u32) -> PixelBuffer {
    let mut buffer = PixelBuffer::blank(width, height, PixelFormat::Rgb8).expect("blank buffer");
    buffer.filter(|x, y, channels| {
        let value = u8::try_from(y * width + x + 1).expect("small buffer");
        channels.fill(value);
    });
    buffer
}

#[test]
fn view_rejects_regions_outside_buffer() {
    let mut buffer = numbered(4, 3);

    for region in [
        Rect::new(0, 0, 5, 1),
        Rect::new(0, 0, 1, 4),
        Rect::new(3, 0, 2, 1),
        Rect::new(0, 2, 1, 2),
        Rect::new(u32::MAX, 0, 1, 1),
    ] {
        assert!(matches!(
            BufferView::new(&buffer, region),
            Err(ResourceError::InvalidRegion { width: 4, height: 3, .. })
        ));
        assert!(BufferViewMut::new(&mut buffer, region).is_err());
    }

    assert!(buffer.view(Rect::new(1, 1, 3, 2)).is_ok());
}

#[test]
fn view_reports_its_own_dimensions() {
    let buffer = numbered(6, 5);
    let view = buffer.view(Rect::new(1, 2, 3, 2)).expect("valid region");

    assert_eq!((view.width(), view.height()), (3, 2));
    assert_eq!(view.pixel(0, 0), buffer.pixel(1, 2));
    assert_eq!(view.pixel(3, 0), None);

    let full = buffer.full_view();
    assert_eq!((full.width(), full.height()), (6, 5));
}

#[test]
fn blit_from_sub_view_copies_only_the_region() {
    let source = numbered(3, 3);
    let centre = source.view(Rect::new(1, 1, 1, 1)).expect("valid region");
    let mut destination = PixelBuffer::blank(2, 2, PixelFormat::Rgb8).expect("blank buffer");

    destination.blit(centre, 1, 0);

    assert_eq!(destination.pixel(1, 0), source.pixel(1, 1));
    assert_eq!(destination.pixel(0, 0), Some(&[0, 0, 0][..]));
    assert_eq!(destination.pixel(0, 1), Some(&[0, 0, 0][..]));
    assert_eq!(destination.pixel(1, 1), Some(&[0, 0, 0][..]));
}

#[test]
fn mutable_view_translates_offsets_by_its_origin() {
    let source = numbered(1, 1);
    let mut destination = PixelBuffer::blank(5, 5, PixelFormat::Rgb8).expect("blank buffer");

    {
        let mut window = destination
            .view_mut(Rect::new(2, 1, 2, 2))
            .expect("valid region");
        window.blit(&source, 1, 1);
    }

    assert_eq!(destination.pixel(3, 2), Some(&[1, 1, 1][..]));
}

#[test]
fn mutable_view_clips_against_underlying_buffer() {
    let source = numbered(3, 3);
    let mut destination = PixelBuffer::blank(4, 4, PixelFormat::Rgb8).expect("blank buffer");

    {
        let mut window = BufferViewMut::new(&mut destination, Rect::new(2, 2, 2, 2))
            .expect("valid region");
        window.blit(&source, 0, 0);
    }

    assert_eq!(destination.pixel(2, 2), source.pixel(0, 0));
    assert_eq!(destination.pixel(3, 3), source.pixel(1, 1));
    assert_eq!(destination.pixel(1, 1), Some(&[0, 0, 0][..]));
}

#[test]
fn canvas_targets_behave_like_direct_blits() {
    let source = numbered(2, 2);
    let mut direct = PixelBuffer::blank(4, 4, PixelFormat::Rgb8).expect("blank buffer");
    direct.blit(&source, 1, 2);

    let mut via_trait = PixelBuffer::blank(4, 4, PixelFormat::Rgb8).expect("blank buffer");
    via_trait.blit_view(source.full_view(), 1, 2);
    assert_eq!(via_trait, direct);

    let mut via_view = PixelBuffer::blank(4, 4, PixelFormat::Rgb8).expect("blank buffer");
    BufferViewMut::full(&mut via_view).blit_view(BufferView::from(&source), 1, 2);
    assert_eq!(via_view, direct);
}
