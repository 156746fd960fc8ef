use ferry_buffers::Region;
use ferry_codec::{
    deep_eq, envelope::constants::REMOTE, ByteBuf, Direct, Envelope, EnvelopeDecoder,
    EnvelopeEncoder, EnvelopeError, EnvelopeOptions, ErrorValue, ValueGraph, ViewEnvelope,
    ViewKind,
};

fn roundtrip(value: &Envelope) -> (Envelope, usize) {
    let mut region = Region::growable(0, 64 * 1024);
    let written = EnvelopeEncoder::new()
        .encode(value, &mut region)
        .unwrap_or_else(|e| panic!("encode failed: {e}"));
    let decoded = EnvelopeDecoder::new()
        .decode(&region)
        .unwrap_or_else(|e| panic!("decode failed: {e}"));
    (decoded, written)
}

#[test]
fn small_integer_fast_path_is_five_bytes() {
    let value = Envelope::Remote {
        tag: REMOTE | 0x01,
        id: 42,
    };
    let mut region = Region::growable(0, 64);
    let written = EnvelopeEncoder::new()
        .encode(&value, &mut region)
        .expect("encode");
    assert_eq!(written, 5);
    assert_eq!(
        &region.as_slice()[..5],
        &[REMOTE | 0x01, 42, 0x00, 0x00, 0x00]
    );
    let decoded = EnvelopeDecoder::new().decode(&region).expect("decode");
    assert_eq!(decoded, value);
}

#[test]
fn remote_negative_id_roundtrips() {
    let value = Envelope::Remote {
        tag: REMOTE | 0x03,
        id: -7,
    };
    let (decoded, written) = roundtrip(&value);
    assert_eq!(written, 5);
    assert_eq!(decoded, value);
}

#[test]
fn any_nonstructural_tag_decodes_as_remote() {
    // 0x42 carries no REMOTE bit and is outside the structural set; the
    // fast path is the default channel for it.
    let mut region = Region::growable(5, 5);
    region.as_mut_slice().copy_from_slice(&[0x42, 0x2a, 0, 0, 0]);
    let decoded = EnvelopeDecoder::new().decode(&region).expect("decode");
    assert_eq!(decoded, Envelope::Remote { tag: 0x42, id: 42 });
}

#[test]
fn buffer_wire_and_roundtrip() {
    let value = Envelope::Buffer(ByteBuf::growable(vec![1, 2, 3], 6));
    let mut region = Region::growable(0, 64);
    let written = EnvelopeEncoder::new()
        .encode(&value, &mut region)
        .expect("encode");
    assert_eq!(written, 12);
    assert_eq!(
        &region.as_slice()[..12],
        // [tag][len=3][growth=6][bytes]
        &[0x01, 3, 0, 0, 0, 6, 0, 0, 0, 1, 2, 3]
    );
    let decoded = EnvelopeDecoder::new().decode(&region).expect("decode");
    assert_eq!(decoded, value);
}

#[test]
fn view_roundtrip_preserves_metadata() {
    let value = Envelope::View(ViewEnvelope {
        kind: ViewKind::Int32,
        byte_offset: 4,
        length: 1,
        buffer: ByteBuf::growable(vec![0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0], 24),
    });
    let (decoded, written) = roundtrip(&value);
    // 13-byte header + UTF-16 name + nested 9-byte buffer header + data.
    let name_len = "Int32Array".len() * 2;
    assert_eq!(written, 13 + name_len + 9 + 12);
    assert_eq!(decoded, value);
}

#[test]
fn json_text_roundtrip_matrix() {
    let values = vec![
        serde_json::json!(null),
        serde_json::json!(true),
        serde_json::json!(123),
        serde_json::json!(-1.5),
        serde_json::json!("hello 🥳"),
        serde_json::json!([1, 2, [3]]),
        serde_json::json!({"a": 1, "b": {"c": null}}),
    ];
    for json in values {
        let (decoded, _) = roundtrip(&Envelope::Json(json.clone()));
        assert_eq!(decoded, Envelope::Json(json));
    }
}

#[test]
fn undefined_travels_as_empty_text() {
    let mut region = Region::growable(0, 64);
    let written = EnvelopeEncoder::new()
        .encode(&Envelope::Undefined, &mut region)
        .expect("encode");
    assert_eq!(written, 5);
    assert_eq!(&region.as_slice()[..5], &[0x03, 0, 0, 0, 0]);
    let decoded = EnvelopeDecoder::new().decode(&region).expect("decode");
    assert_eq!(decoded, Envelope::Undefined);
}

#[test]
fn error_never_coerces_to_plain_text() {
    let value = Envelope::Error(ErrorValue {
        name: "RangeError".into(),
        message: "out of range".into(),
        stack: "at boundary".into(),
    });
    let mut region = Region::growable(0, 1024);
    EnvelopeEncoder::new()
        .encode(&value, &mut region)
        .expect("encode");
    assert_eq!(region.as_slice()[0], 0x05, "must carry the failure tag");
    let decoded = EnvelopeDecoder::new().decode(&region).expect("decode");
    assert_eq!(decoded, value);
}

#[test]
fn direct_delegates_to_deep_codec_when_enabled() {
    let mut graph = ValueGraph::new();
    let root = graph.insert_json(&serde_json::json!({"k": [1, 2], "t": "text"}));
    let value = Envelope::Direct(Direct::Value(graph.clone(), root));

    let options = EnvelopeOptions {
        byte_offset: 0,
        direct: true,
    };
    let mut region = Region::growable(0, 4096);
    EnvelopeEncoder::with_options(options)
        .encode(&value, &mut region)
        .expect("encode");
    assert_eq!(region.as_slice()[0], 0x04);

    match EnvelopeDecoder::with_options(options)
        .decode(&region)
        .expect("decode")
    {
        Envelope::Direct(Direct::Value(decoded, out)) => {
            assert!(deep_eq(&graph, root, &decoded, out));
        }
        other => panic!("expected direct value, got {other:?}"),
    }
}

#[test]
fn direct_without_transform_falls_back_to_text() {
    let mut graph = ValueGraph::new();
    let root = graph.insert_json(&serde_json::json!({"k": 1}));
    let value = Envelope::Direct(Direct::Value(graph, root));

    let (decoded, _) = roundtrip(&value);
    assert_eq!(decoded, Envelope::Json(serde_json::json!({"k": 1})));
}

#[test]
fn direct_bytes_pass_through_verbatim() {
    let payload = vec![0xde, 0xad, 0xbe, 0xef];
    let value = Envelope::Direct(Direct::Bytes(payload.clone()));
    let mut region = Region::growable(0, 64);
    let written = EnvelopeEncoder::new()
        .encode(&value, &mut region)
        .expect("encode");
    assert_eq!(written, 9);
    assert_eq!(&region.as_slice()[5..9], &payload[..]);
    let decoded = EnvelopeDecoder::new().decode(&region).expect("decode");
    assert_eq!(decoded, value);
}

#[test]
fn byte_offset_places_and_reads_the_envelope() {
    let options = EnvelopeOptions {
        byte_offset: 8,
        direct: false,
    };
    let value = Envelope::Remote {
        tag: REMOTE | 0x02,
        id: 9,
    };
    let mut region = Region::growable(8, 64);
    region.as_mut_slice()[..8].copy_from_slice(&[0xff; 8]);
    EnvelopeEncoder::with_options(options)
        .encode(&value, &mut region)
        .expect("encode");
    // Bytes before the offset are untouched.
    assert_eq!(&region.as_slice()[..8], &[0xff; 8]);
    let decoded = EnvelopeDecoder::with_options(options)
        .decode(&region)
        .expect("decode");
    assert_eq!(decoded, value);
}

#[test]
fn region_grows_to_cumulative_size_without_corruption() {
    let mut region = Region::growable(2, 4096);
    let first = Envelope::Buffer(ByteBuf::fixed(vec![7; 16]));
    let written_first = EnvelopeEncoder::new()
        .encode(&first, &mut region)
        .expect("first encode");
    let snapshot = region.as_slice()[..written_first].to_vec();

    let second = Envelope::Json(serde_json::json!("second message"));
    let written_second = EnvelopeEncoder::with_options(EnvelopeOptions {
        byte_offset: written_first,
        direct: false,
    })
    .encode(&second, &mut region)
    .expect("second encode");

    assert!(region.len() >= written_first + written_second);
    assert_eq!(&region.as_slice()[..written_first], &snapshot[..]);

    let decoded_first = EnvelopeDecoder::new().decode(&region).expect("decode first");
    assert_eq!(decoded_first, first);
    let decoded_second = EnvelopeDecoder::with_options(EnvelopeOptions {
        byte_offset: written_first,
        direct: false,
    })
    .decode(&region)
    .expect("decode second");
    assert_eq!(decoded_second, second);
}

#[test]
fn growth_failure_is_propagated_not_retried() {
    let mut fixed = Region::new(4);
    let err = EnvelopeEncoder::new()
        .encode(
            &Envelope::Remote {
                tag: REMOTE,
                id: 1,
            },
            &mut fixed,
        )
        .unwrap_err();
    assert_eq!(err, EnvelopeError::RegionExhausted);

    let mut bounded = Region::growable(0, 8);
    let err = EnvelopeEncoder::new()
        .encode(&Envelope::Buffer(ByteBuf::fixed(vec![0; 16])), &mut bounded)
        .unwrap_err();
    assert_eq!(err, EnvelopeError::RegionExhausted);
}

#[test]
fn truncated_envelope_fails_deterministically() {
    let mut region = Region::growable(0, 1024);
    EnvelopeEncoder::new()
        .encode(&Envelope::Buffer(ByteBuf::fixed(vec![1, 2, 3])), &mut region)
        .expect("encode");
    let bytes = region.as_slice().to_vec();
    let mut decoder = EnvelopeDecoder::new();
    for cut in 0..bytes.len() {
        assert!(
            decoder.decode_slice(&bytes[..cut]).is_err(),
            "cut at {cut} must fail"
        );
    }
}

#[test]
fn invalid_json_text_is_rejected() {
    let mut region = Region::growable(0, 64);
    EnvelopeEncoder::new()
        .encode(&Envelope::Json(serde_json::json!("ok")), &mut region)
        .expect("encode");
    // Corrupt the first code unit of the escaped text (the opening quote).
    region.as_mut_slice()[5] = b'x';
    match EnvelopeDecoder::new().decode(&region) {
        Err(EnvelopeError::InvalidJson(_)) => {}
        other => panic!("expected invalid json, got {other:?}"),
    }
}
