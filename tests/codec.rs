use std::borrow::Cow;

use blobsync::{
    BlobCodec, CodecErr, DenseBuffer, ElementKind, Part, RegionKind, SyncBuffer,
    specs::{CompressionSpec, SyncSpec},
};

fn f32_codec() -> BlobCodec<f32> {
    BlobCodec::from_spec(&SyncSpec::default(), true).unwrap()
}

fn f64_codec() -> BlobCodec<f64> {
    let spec = SyncSpec {
        element: ElementKind::F64,
        ..SyncSpec::default()
    };
    BlobCodec::from_spec(&spec, true).unwrap()
}

fn bits32(values: &[f32]) -> Vec<u32> {
    values.iter().map(|x| x.to_bits()).collect()
}

fn bits64(values: &[f64]) -> Vec<u64> {
    values.iter().map(|x| x.to_bits()).collect()
}

#[test]
fn encode_4x3x2x1_grads_is_verbatim() {
    let mut src = DenseBuffer::<f32>::new(&[4, 3, 2, 1]);
    let grads = [
        999.99,
        12.3,
        0.1,
        -3.3,
        2.0,
        12.3,
        10.2,
        f32::MAX,
        4.4,
        12.3,
        0.0,
        -1.3,
        6.5,
        12.3,
        24.42,
        1010.10,
        f32::MIN_POSITIVE,
        12.3,
        66.6,
        133.1,
        12.4,
        12.3,
        0.0001,
        100.3,
    ];
    assert_eq!(grads.len() as u64, src.element_count());
    src.set_grads(&grads);

    let codec = f32_codec();
    let part = Part::whole(src.element_count());
    let update = codec.encode(&src, RegionKind::Grads, part).unwrap();

    assert_eq!(update.kind, RegionKind::Grads);
    assert_eq!(update.part, part);
    assert_eq!(update.element, ElementKind::F32);
    assert_eq!(&*update.payload, bytemuck::cast_slice::<f32, u8>(&grads));
}

#[test]
fn encode_decode_2x2x2x2_params_round_trips() {
    let mut src = DenseBuffer::<f32>::new(&[2, 2, 2, 2]);
    let mut dst = DenseBuffer::<f32>::new(&[2, 2, 2, 2]);
    let data = [
        1.1, -2.2, 3.3, 5.5, 6.6, -7.7, 8.8, 9.9, 13.13, -12.12, 12.12, 11.11, 128.128, -132.312,
        1.1, -10.10,
    ];
    src.set_params(&data);

    let codec = f32_codec();
    let part = Part::whole(src.element_count());
    let update = codec.encode(&src, RegionKind::Params, part).unwrap();
    codec
        .decode(&update, &mut dst, RegionKind::Params, 1.0, 0.0)
        .unwrap();

    assert_eq!(bits32(dst.params()), bits32(&data));
}

#[test]
fn encode_8wide_preserves_signed_zero() {
    let mut src = DenseBuffer::<f32>::new(&[1, 1, 1, 8]);
    let data = [-0.0, -0.3, -2.2, -3.3, 0.0, 12.3, 10.2, -1.3];
    src.set_params(&data);

    let codec = f32_codec();
    let update = codec
        .encode(&src, RegionKind::Params, Part::whole(8))
        .unwrap();
    assert_eq!(&*update.payload, bytemuck::cast_slice::<f32, u8>(&data));

    let mut dst = DenseBuffer::<f32>::new(&[1, 1, 1, 8]);
    codec
        .decode(&update, &mut dst, RegionKind::Params, 1.0, 0.0)
        .unwrap();
    assert_eq!(bits32(dst.params()), bits32(&data));
}

#[test]
fn round_trip_keeps_extremal_values_bit_for_bit() {
    let mut src = DenseBuffer::<f64>::new(&[6]);
    let data = [
        f64::MAX,
        f64::MIN,
        f64::MIN_POSITIVE,
        5e-324, // smallest subnormal
        -0.0,
        0.0,
    ];
    src.set_grads(&data);

    let codec = f64_codec();
    let update = codec.encode(&src, RegionKind::Grads, Part::whole(6)).unwrap();

    let mut dst = DenseBuffer::<f64>::new(&[6]);
    codec
        .decode(&update, &mut dst, RegionKind::Grads, 1.0, 0.0)
        .unwrap();
    assert_eq!(bits64(dst.grads()), bits64(&data));
}

#[test]
fn decode_alpha_half_halves_the_source() {
    let mut src = DenseBuffer::<f32>::new(&[1, 1, 1, 4]);
    src.set_params(&[4.0, 3.2, 2.4, 1.4]);

    let codec = f32_codec();
    let update = codec
        .encode(&src, RegionKind::Params, Part::whole(4))
        .unwrap();

    let mut dst = DenseBuffer::<f32>::new(&[1, 1, 1, 4]);
    codec
        .decode(&update, &mut dst, RegionKind::Params, 0.5, 0.0)
        .unwrap();

    assert_eq!(dst.params(), &[2.0, 1.6, 1.2, 0.7]);
}

#[test]
fn decode_beta_half_blends_with_prior() {
    let mut src = DenseBuffer::<f32>::new(&[1, 1, 1, 4]);
    src.set_params(&[4.0, 3.2, 2.4, 1.4]);

    let codec = f32_codec();
    let update = codec
        .encode(&src, RegionKind::Params, Part::whole(4))
        .unwrap();

    let mut dst = DenseBuffer::<f32>::new(&[1, 1, 1, 4]);
    dst.set_params(&[1.0, 1.0, 1.0, 1.0]);
    codec
        .decode(&update, &mut dst, RegionKind::Params, 1.0, 0.5)
        .unwrap();

    assert_eq!(dst.params(), &[4.5, 3.7, 2.9, 1.9]);
}

#[test]
fn decode_equal_weights_averages() {
    let mut src = DenseBuffer::<f32>::new(&[1, 1, 1, 4]);
    src.set_params(&[4.0, 3.2, 2.4, 1.4]);

    let codec = f32_codec();
    let update = codec
        .encode(&src, RegionKind::Params, Part::whole(4))
        .unwrap();

    let mut dst = DenseBuffer::<f32>::new(&[1, 1, 1, 4]);
    dst.set_params(&[1.0, 1.0, 1.0, 1.0]);
    codec
        .decode(&update, &mut dst, RegionKind::Params, 0.5, 0.5)
        .unwrap();

    assert_eq!(dst.params(), &[2.5, 2.1, 1.7, 1.2]);
}

#[test]
fn decode_alpha_zero_beta_one_is_a_noop() {
    let mut src = DenseBuffer::<f32>::new(&[1, 1, 1, 4]);
    src.set_params(&[4.0, 3.2, 2.4, 1.4]);

    let codec = f32_codec();
    let update = codec
        .encode(&src, RegionKind::Params, Part::whole(4))
        .unwrap();

    let prior = [1.1, 2.3, 1.4, 0.01];
    let mut dst = DenseBuffer::<f32>::new(&[1, 1, 1, 4]);
    dst.set_params(&prior);
    codec
        .decode(&update, &mut dst, RegionKind::Params, 0.0, 1.0)
        .unwrap();

    assert_eq!(bits32(dst.params()), bits32(&prior));
}

#[test]
fn noop_decode_of_non_finite_source_leaves_destination_unchanged() {
    let mut src = DenseBuffer::<f32>::new(&[4]);
    src.set_params(&[f32::NAN, f32::INFINITY, f32::NEG_INFINITY, -0.0]);

    let codec = f32_codec();
    let update = codec
        .encode(&src, RegionKind::Params, Part::whole(4))
        .unwrap();

    let prior = [-0.0f32, 1.0, 2.0, 3.0];
    let mut dst = DenseBuffer::<f32>::new(&[4]);
    dst.set_params(&prior);
    codec
        .decode(&update, &mut dst, RegionKind::Params, 0.0, 1.0)
        .unwrap();

    assert_eq!(bits32(dst.params()), bits32(&prior));
}

#[test]
fn blend_matches_the_formula_for_arbitrary_weights() {
    let source = [3.75f32, -12.5, 0.125, 1e-20, 42.0, -0.875];
    let prior = [1.5f32, 2.25, -4.0, 8.0, -16.0, 0.5];
    let (alpha, beta) = (0.3f32, -1.7f32);

    let mut src = DenseBuffer::<f32>::new(&[6]);
    src.set_grads(&source);

    let codec = f32_codec();
    let update = codec.encode(&src, RegionKind::Grads, Part::whole(6)).unwrap();

    let mut dst = DenseBuffer::<f32>::new(&[6]);
    dst.set_grads(&prior);
    codec
        .decode(&update, &mut dst, RegionKind::Grads, alpha, beta)
        .unwrap();

    for ((d, s), p) in dst.grads().iter().zip(&source).zip(&prior) {
        assert_eq!(d.to_bits(), (alpha * s + beta * p).to_bits());
    }
}

#[test]
fn grad_accumulation_sums_updates() {
    let mut src = DenseBuffer::<f32>::new(&[3]);
    src.set_grads(&[1.0, 2.0, 3.0]);

    let codec = f32_codec();
    let update = codec.encode(&src, RegionKind::Grads, Part::whole(3)).unwrap();

    let mut dst = DenseBuffer::<f32>::new(&[3]);
    dst.set_grads(&[10.0, 20.0, 30.0]);
    codec
        .decode(&update, &mut dst, RegionKind::Grads, 1.0, 1.0)
        .unwrap();

    assert_eq!(dst.grads(), &[11.0, 22.0, 33.0]);
}

#[test]
fn kind_mismatch_never_touches_the_wrong_region() {
    let mut src = DenseBuffer::<f32>::new(&[4]);
    src.set_grads(&[1.0, 2.0, 3.0, 4.0]);

    let codec = f32_codec();
    let update = codec.encode(&src, RegionKind::Grads, Part::whole(4)).unwrap();

    let mut dst = DenseBuffer::<f32>::new(&[4]);
    dst.set_params(&[9.0, 9.0, 9.0, 9.0]);
    let err = codec
        .decode(&update, &mut dst, RegionKind::Params, 1.0, 0.0)
        .unwrap_err();

    assert!(matches!(
        err,
        CodecErr::KindMismatch {
            got: RegionKind::Grads,
            expected: RegionKind::Params
        }
    ));
    assert_eq!(dst.params(), &[9.0, 9.0, 9.0, 9.0]);
    assert_eq!(dst.grads(), &[0.0, 0.0, 0.0, 0.0]);
}

#[test]
fn element_mismatch_is_rejected_on_decode() {
    let mut src = DenseBuffer::<f32>::new(&[2]);
    src.set_params(&[1.0, 2.0]);

    let update = f32_codec()
        .encode(&src, RegionKind::Params, Part::whole(2))
        .unwrap();

    let mut dst = DenseBuffer::<f64>::new(&[2]);
    let err = f64_codec()
        .decode(&update, &mut dst, RegionKind::Params, 1.0, 0.0)
        .unwrap_err();

    assert!(matches!(
        err,
        CodecErr::ElementMismatch {
            got: ElementKind::F32,
            expected: ElementKind::F64
        }
    ));
}

#[test]
fn disjoint_parts_reconstruct_the_full_buffer() {
    let data: Vec<f32> = (0..10).map(|i| i as f32 * 1.25 - 3.0).collect();
    let mut src = DenseBuffer::<f32>::new(&[10]);
    src.set_params(&data);

    let codec = f32_codec();
    let first = codec
        .encode(&src, RegionKind::Params, Part::new(0, 6))
        .unwrap();
    let second = codec
        .encode(&src, RegionKind::Params, Part::new(6, 4))
        .unwrap();

    // Parts are self-describing; decode them out of order.
    let mut dst = DenseBuffer::<f32>::new(&[10]);
    codec
        .decode(&second, &mut dst, RegionKind::Params, 1.0, 0.0)
        .unwrap();
    codec
        .decode(&first, &mut dst, RegionKind::Params, 1.0, 0.0)
        .unwrap();

    assert_eq!(bits32(dst.params()), bits32(&data));
}

#[test]
fn decode_writes_only_inside_the_addressed_range() {
    let mut src = DenseBuffer::<f32>::new(&[8]);
    src.set_params(&[0.0, 0.0, 10.0, 20.0, 30.0, 0.0, 0.0, 0.0]);

    let codec = f32_codec();
    let update = codec
        .encode(&src, RegionKind::Params, Part::new(2, 3))
        .unwrap();

    let mut dst = DenseBuffer::<f32>::new(&[8]);
    dst.set_params(&[7.0; 8]);
    codec
        .decode(&update, &mut dst, RegionKind::Params, 1.0, 0.0)
        .unwrap();

    assert_eq!(
        dst.params(),
        &[7.0, 7.0, 10.0, 20.0, 30.0, 7.0, 7.0, 7.0]
    );
}

#[test]
fn out_of_bounds_part_is_rejected_by_encode() {
    let src = DenseBuffer::<f32>::new(&[4]);
    let codec = f32_codec();

    let err = codec
        .encode(&src, RegionKind::Params, Part::new(2, 3))
        .unwrap_err();
    assert!(matches!(err, CodecErr::OutOfRange { total: 4, .. }));

    let err = codec
        .encode(&src, RegionKind::Params, Part::new(u64::MAX, 1))
        .unwrap_err();
    assert!(matches!(err, CodecErr::OutOfRange { .. }));
}

#[test]
fn out_of_bounds_part_is_rejected_by_decode() {
    let mut src = DenseBuffer::<f32>::new(&[8]);
    src.set_params(&[1.0; 8]);

    let codec = f32_codec();
    let update = codec
        .encode(&src, RegionKind::Params, Part::new(4, 4))
        .unwrap();

    // The destination is too small for the addressed range.
    let mut dst = DenseBuffer::<f32>::new(&[6]);
    let err = codec
        .decode(&update, &mut dst, RegionKind::Params, 1.0, 0.0)
        .unwrap_err();

    assert!(matches!(err, CodecErr::OutOfRange { total: 6, .. }));
    assert_eq!(dst.params(), &[0.0; 6]);
}

#[test]
fn tampered_payload_length_is_rejected() {
    let mut src = DenseBuffer::<f32>::new(&[4]);
    src.set_params(&[1.0, 2.0, 3.0, 4.0]);

    let codec = f32_codec();
    let update = codec
        .encode(&src, RegionKind::Params, Part::whole(4))
        .unwrap();

    let truncated = blobsync::Update {
        payload: Cow::Borrowed(&update.payload[..8]),
        ..update
    };

    let mut dst = DenseBuffer::<f32>::new(&[4]);
    let err = codec
        .decode(&truncated, &mut dst, RegionKind::Params, 1.0, 0.0)
        .unwrap_err();

    assert!(matches!(
        err,
        CodecErr::PayloadSizeMismatch {
            got: 8,
            expected: 16
        }
    ));
}

#[test]
fn optimized_path_borrows_the_region() {
    let mut src = DenseBuffer::<f32>::new(&[4]);
    src.set_params(&[1.0, 2.0, 3.0, 4.0]);

    let optimized = BlobCodec::<f32>::from_spec(&SyncSpec::default(), true).unwrap();
    let update = optimized
        .encode(&src, RegionKind::Params, Part::whole(4))
        .unwrap();
    assert!(matches!(update.payload, Cow::Borrowed(_)));

    let plain = BlobCodec::<f32>::from_spec(&SyncSpec::default(), false).unwrap();
    let update = plain
        .encode(&src, RegionKind::Params, Part::whole(4))
        .unwrap();
    assert!(matches!(update.payload, Cow::Owned(_)));
}

#[test]
fn factory_rejects_unshipped_compression_modes() {
    for compression in [
        CompressionSpec::Fp16,
        CompressionSpec::Threshold { cutoff: 0.5 },
    ] {
        let spec = SyncSpec {
            compression,
            ..SyncSpec::default()
        };

        let err = BlobCodec::<f32>::from_spec(&spec, true).unwrap_err();
        assert!(matches!(
            err,
            CodecErr::UnsupportedConfig {
                option: "compression",
                ..
            }
        ));
    }
}

#[test]
fn factory_rejects_a_foreign_element_type() {
    let spec = SyncSpec {
        element: ElementKind::F64,
        ..SyncSpec::default()
    };

    let err = BlobCodec::<f32>::from_spec(&spec, true).unwrap_err();
    assert!(matches!(
        err,
        CodecErr::UnsupportedConfig {
            option: "element",
            ..
        }
    ));
}
