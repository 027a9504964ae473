use frame_metrics::{
    DecodeErrorKind, DecodeOptions, DiagnosticKind, LogDecoder, MalformedPolicy, MetricsModel,
    decode_log,
    proto::{
        LogWriter, SchemaVersion,
        wire::{legacy, v1},
    },
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn sample_frame(frame_id: i64) -> v1::SessionFrame {
    v1::SessionFrame {
        frame_id,
        when_predicted_ns: 0,
        when_wait_woke_ns: 1_000_000,
        when_begin_ns: 4_000_000,
        when_delivered_ns: 9_000_000,
        when_gpu_done_ns: 15_000_000,
        predicted_gpu_done_time_ns: 2_000_000,
        predicted_display_time_ns: 3_000_000,
        discarded: false,
        ..Default::default()
    }
}

fn versioned_log(body: impl FnOnce(&mut LogWriter<Vec<u8>>)) -> Vec<u8> {
    let mut w = LogWriter::new(Vec::new());
    w.write_version(1, 0).unwrap();
    body(&mut w);
    w.into_inner()
}

fn assert_aligned(m: &MetricsModel) {
    let n = m.frame_ids.len();
    for (name, s) in m.absolute.named_series() {
        assert_eq!(s.len(), n, "absolute.{name}");
    }
    for (name, s) in m.relative_gpu.named_series() {
        assert_eq!(s.len(), n, "relative_gpu.{name}");
    }
    for (name, s) in m.relative_display.named_series() {
        assert_eq!(s.len(), n, "relative_display.{name}");
    }

    let n = m.system.frame_ids.len();
    for (name, s) in m.system.absolute.named_series() {
        assert_eq!(s.len(), n, "system.absolute.{name}");
    }
    for (name, s) in m.system.relative_present.named_series() {
        assert_eq!(s.len(), n, "system.relative_present.{name}");
    }
}

#[test]
fn empty_log_is_an_empty_model() {
    init_tracing();

    assert_eq!(decode_log(&[]).unwrap(), MetricsModel::new());
}

#[test]
fn session_frame_metrics() {
    init_tracing();
    let log = versioned_log(|w| w.write_session_frame(&sample_frame(1)).unwrap());

    let m = decode_log(&log).unwrap();
    assert_eq!(m.frame_ids, [1]);
    assert_eq!(m.absolute.cpu_ms, [3.0]);
    assert_eq!(m.absolute.draw_ms, [5.0]);
    assert_eq!(m.absolute.gpu_ms, [6.0]);
    assert_eq!(m.relative_gpu.done_gpu_ms, [13.0]);
    assert_eq!(m.relative_display.done_gpu_ms, [12.0]);
    assert_aligned(&m);
}

#[test]
fn discarded_frames_are_excluded() {
    init_tracing();
    let log = versioned_log(|w| {
        w.write_session_frame(&v1::SessionFrame {
            discarded: true,
            ..sample_frame(7)
        })
        .unwrap();
        w.write_session_frame(&sample_frame(8)).unwrap();
    });

    let m = decode_log(&log).unwrap();
    assert_eq!(m.frame_ids, [8]);
    assert_eq!(m.absolute.len(), 1);
    assert_eq!(m.relative_gpu.len(), 1);
    assert_eq!(m.relative_display.len(), 1);
    assert_aligned(&m);
}

#[test]
fn missing_version_header() {
    init_tracing();
    let mut w = LogWriter::new(Vec::new());
    w.write_session_frame(&sample_frame(1)).unwrap();

    let e = decode_log(&w.into_inner()).unwrap_err();
    assert!(matches!(e.kind, DecodeErrorKind::MissingVersionHeader));
    assert_eq!((e.record_index, e.offset), (0, 0));
}

#[test]
fn unknown_first_record_is_a_missing_header() {
    init_tracing();
    let mut w = LogWriter::new(Vec::new());
    w.write_raw(99, &[]).unwrap();
    w.write_version(1, 0).unwrap();

    let e = decode_log(&w.into_inner()).unwrap_err();
    assert!(matches!(e.kind, DecodeErrorKind::MissingVersionHeader));
}

#[test]
fn duplicate_version() {
    init_tracing();
    let log = versioned_log(|w| {
        w.write_session_frame(&sample_frame(1)).unwrap();
        w.write_version(1, 0).unwrap();
        w.write_session_frame(&sample_frame(2)).unwrap();
    });

    let e = decode_log(&log).unwrap_err();
    assert!(matches!(e.kind, DecodeErrorKind::DuplicateVersion));
    assert_eq!(e.record_index, 2);
}

#[test]
fn unsupported_major_version() {
    init_tracing();
    let mut w = LogWriter::new(Vec::new());
    w.write_version(2, 5).unwrap();
    w.write_session_frame(&sample_frame(1)).unwrap();

    let e = decode_log(&w.into_inner()).unwrap_err();
    assert!(matches!(
        e.kind,
        DecodeErrorKind::UnsupportedVersion { major: 2, minor: 5 }
    ));
    assert!(e.to_string().contains("2.5"));
}

#[test]
fn unknown_record_kinds_are_skipped_and_reported() {
    init_tracing();
    let log = versioned_log(|w| {
        w.write_session_frame(&sample_frame(1)).unwrap();
        w.write_raw(42, &[0x08, 0x01]).unwrap();
        w.write_session_frame(&sample_frame(2)).unwrap();
        w.write_raw(42, &[]).unwrap();
        w.write_raw(120, &[]).unwrap();
        w.write_session_frame(&sample_frame(3)).unwrap();
    });

    let d = LogDecoder::default().decode(&log).unwrap();
    assert_eq!(d.metrics.frame_ids, [1, 2, 3]);
    assert_aligned(&d.metrics);
    assert_eq!(d.records, 7);

    let tags = d
        .diagnostics
        .iter()
        .map(|x| match x.kind {
            DiagnosticKind::UnknownRecordKind { tag } => (x.record_index, tag),
            ref k => panic!("unexpected diagnostic {k}"),
        })
        .collect::<Vec<_>>();
    assert_eq!(tags, [(2, 42), (4, 42), (5, 120)]);
    assert!(d.diagnostics[0].to_string().contains("unknown record kind 42"));
}

#[test]
fn malformed_records_follow_policy() {
    init_tracing();
    let log = versioned_log(|w| {
        w.write_session_frame(&sample_frame(1)).unwrap();
        // session frame body whose frame_id is a fixed32
        w.write_raw(v1::tag::SESSION_FRAME, &[0x15, 0, 0, 0, 0]).unwrap();
        w.write_session_frame(&sample_frame(2)).unwrap();
    });

    let skipped = LogDecoder::default().decode(&log).unwrap();
    assert_eq!(skipped.metrics.frame_ids, [1, 2]);
    assert_eq!(skipped.diagnostics.len(), 1);
    assert_eq!(skipped.diagnostics[0].record_index, 2);
    assert!(matches!(
        skipped.diagnostics[0].kind,
        DiagnosticKind::MalformedRecord(_)
    ));

    let e = LogDecoder::new(DecodeOptions::new().malformed(MalformedPolicy::Abort))
        .decode(&log)
        .unwrap_err();
    assert!(matches!(e.kind, DecodeErrorKind::MalformedRecord(_)));
    assert_eq!(e.record_index, 2);
}

#[test]
fn truncated_frame_is_fatal_with_position() {
    init_tracing();
    let mut log = versioned_log(|w| w.write_session_frame(&sample_frame(1)).unwrap());
    let last_offset = log.len();
    log.extend([0x10, 0x01, 0x02]);
    let e = decode_log(&log).unwrap_err();
    assert!(matches!(
        e.kind,
        DecodeErrorKind::TruncatedFrame {
            declared: 16,
            available: 2
        }
    ));
    assert_eq!((e.record_index, e.offset), (2, last_offset));
}

#[test]
fn truncated_length_prefix() {
    init_tracing();
    let mut log = versioned_log(|_| ());
    let last_offset = log.len();
    log.push(0x80);

    let e = decode_log(&log).unwrap_err();
    assert!(matches!(e.kind, DecodeErrorKind::TruncatedVarint));
    assert_eq!((e.record_index, e.offset), (1, last_offset));
}

#[test]
fn overlong_length_prefix() {
    init_tracing();
    let mut log = versioned_log(|_| ());
    let header_len = log.len();
    log.extend([0xff; 10]);
    log.push(0x02);

    let e = decode_log(&log).unwrap_err();
    assert!(matches!(e.kind, DecodeErrorKind::OverlongVarint));
    assert_eq!((e.record_index, e.offset), (1, header_len));
}

#[test]
fn broken_version_record_is_still_a_duplicate() {
    init_tracing();
    // version discriminant with a body cut off mid-varint
    let broken_body = versioned_log(|w| w.write_raw(v1::tag::VERSION, &[0x08]).unwrap());
    // version discriminant sent as a varint instead of a message
    let not_a_message = versioned_log(|w| w.write_frame(&[0x08, 0x01]).unwrap());

    for log in [broken_body, not_a_message] {
        let e = LogDecoder::default().decode(&log).unwrap_err();
        assert!(matches!(e.kind, DecodeErrorKind::DuplicateVersion));
        assert_eq!(e.record_index, 1);
    }
}

#[test]
fn system_records() {
    init_tracing();
    let log = versioned_log(|w| {
        w.write_system_frame(&v1::SystemFrame {
            frame_id: 10,
            ..Default::default()
        })
        .unwrap();
        w.write_system_gpu_info(&v1::SystemGpuInfo {
            frame_id: 10,
            start_gpu_ns: 100_000_000,
            end_gpu_ns: 103_250_000,
            when_ns: 104_000_000,
        })
        .unwrap();
        w.write_system_present_info(&v1::SystemPresentInfo {
            frame_id: 10,
            when_predict_ns: 90_000_000,
            when_woke_ns: 95_000_000,
            when_began_ns: 96_000_000,
            when_submitted_ns: 99_000_000,
            desired_present_time_ns: 110_000_000,
            actual_present_time_ns: 111_000_000,
            present_margin_ns: 5_000_000,
            ..Default::default()
        })
        .unwrap();
        w.write_used(&v1::Used {
            session_frame_id: 3,
            system_frame_id: 10,
            ..Default::default()
        })
        .unwrap();
    });

    let m = decode_log(&log).unwrap();
    assert!(m.frame_ids.is_empty());
    assert_eq!(m.system.frame_ids, [10]);
    assert_eq!(m.system.absolute_gpu_only.gpu_ms, [3.25]);
    assert_eq!(m.system.absolute.cpu_ms, [1.0]);
    assert_eq!(m.system.absolute.draw_ms, [3.0]);
    assert_eq!(m.system.absolute.gpu_ms, [7.0]);

    let r = &m.system.relative_present;
    assert_eq!(r.predicted_ms, [-20.0]);
    assert_eq!(r.start_cpu_ms, [-15.0]);
    assert_eq!(r.done_cpu_ms, [-14.0]);
    assert_eq!(r.submitted_ms, [-11.0]);
    assert_eq!(r.gpu_ms, [-4.0]);
    assert_eq!(r.present_ms, [1.0]);
    assert_aligned(&m);
}

#[test]
fn headerless_legacy_log() {
    init_tracing();
    let mut w = LogWriter::new(Vec::new());
    w.write_message(legacy::tag::SESSION_FRAME, &sample_frame(5))
        .unwrap();
    w.write_message(legacy::tag::SYSTEM_FRAME, &legacy::SystemFrame { frame_id: 1 })
        .unwrap();
    w.write_message(
        legacy::tag::SYSTEM_GPU_INFO,
        &legacy::SystemGpuInfo {
            gpu_start_ns: 1_000_000,
            gpu_end_ns: 3_000_000,
        },
    )
    .unwrap();
    let log = w.into_inner();

    // tag 1 is a session frame here, not a version record
    assert!(matches!(
        decode_log(&log).unwrap_err().kind,
        DecodeErrorKind::UnsupportedVersion { .. } | DecodeErrorKind::MissingVersionHeader
    ));

    let d = LogDecoder::new(DecodeOptions::new().headerless(SchemaVersion::Legacy))
        .decode(&log)
        .unwrap();
    assert_eq!(d.schema, Some(SchemaVersion::Legacy));
    assert_eq!(d.version, None);
    assert_eq!(d.metrics.frame_ids, [5]);
    assert_eq!(d.metrics.absolute.cpu_ms, [3.0]);
    assert_eq!(d.metrics.system.absolute_gpu_only.gpu_ms, [2.0]);
    assert!(d.diagnostics.is_empty());
}

#[test]
fn decoding_is_deterministic() {
    init_tracing();
    let log = versioned_log(|w| {
        for i in 0..32 {
            let mut f = sample_frame(i);
            f.when_gpu_done_ns += i as u64 * 333_333;
            f.discarded = i % 5 == 0;
            w.write_session_frame(&f).unwrap();
            w.write_system_gpu_info(&v1::SystemGpuInfo {
                frame_id: i,
                start_gpu_ns: i as u64 * 1_000_001,
                end_gpu_ns: i as u64 * 1_000_001 + 777_777,
                when_ns: 0,
            })
            .unwrap();
        }
    });

    let a = decode_log(&log).unwrap();
    let b = decode_log(&log).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.frame_ids.len(), 25);
    assert_aligned(&a);

    let bits = |m: &MetricsModel| {
        m.relative_gpu
            .named_series()
            .into_iter()
            .flat_map(|(_, s)| s.iter().map(|v| v.to_bits()))
            .collect::<Vec<_>>()
    };
    assert_eq!(bits(&a), bits(&b));
}
