use std::io::Write;

use frame_metrics::{
    DecodeOptions, LogDecoder, MalformedPolicy, MetricsModel, proto::SchemaVersion,
};

fn print_rows(
    w: &mut impl Write,
    section: &str,
    frame_ids: &[i64],
    series: &[(&'static str, &[f64])],
) -> std::io::Result<()> {
    for (metric, values) in series {
        for (frame_id, v) in frame_ids.iter().zip(values.iter()) {
            writeln!(w, "{section},{frame_id},{metric},{v}")?;
        }
    }

    Ok(())
}

fn print_metrics(w: &mut impl Write, m: &MetricsModel) -> std::io::Result<()> {
    writeln!(w, "section,frame_id,metric,value_ms")?;
    print_rows(w, "absolute", &m.frame_ids, &m.absolute.named_series())?;
    print_rows(w, "relative_gpu", &m.frame_ids, &m.relative_gpu.named_series())?;
    print_rows(w, "relative_display", &m.frame_ids, &m.relative_display.named_series())?;

    let s = &m.system;
    print_rows(w, "system_absolute", &s.frame_ids, &s.absolute.named_series())?;
    print_rows(w, "system_relative_present", &s.frame_ids, &s.relative_present.named_series())?;
    // gpu samples carry no frame id in every layout; index them instead
    for (n, v) in s.absolute_gpu_only.gpu_ms.iter().enumerate() {
        writeln!(w, "system_absolute_gpu_only,{n},gpu_ms,{v}")?;
    }

    Ok(())
}

fn main() -> std::process::ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();
    std::panic::set_hook(Box::new(move |info| {
        tracing::error!(%info, "printer panic");
    }));

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        tracing::error!("usage: frame-metrics-printer <FILE> [--legacy] [--strict]");
        return std::process::ExitCode::from(2);
    };

    let mut options = DecodeOptions::new();
    for a in args {
        match a.as_str() {
            "--legacy" => options = options.headerless(SchemaVersion::Legacy),
            "--strict" => options = options.malformed(MalformedPolicy::Abort),
            _ => tracing::warn!(arg = %a, "unknown argument ignored"),
        }
    }

    let bytes = match std::fs::read(&path) {
        Ok(b) => b,
        Err(e) => {
            tracing::error!(reason = ?e, %path, "reading log failed");
            return std::process::ExitCode::FAILURE;
        }
    };

    let decoded = match LogDecoder::new(options).decode(&bytes) {
        Ok(d) => d,
        Err(e) => {
            tracing::error!(%e, %path, "decoding log failed");
            return std::process::ExitCode::FAILURE;
        }
    };
    if let Some(v) = decoded.version {
        tracing::info!(major = v.major, minor = v.minor, "log version");
    }
    for d in &decoded.diagnostics {
        tracing::debug!(%d, "skipped record");
    }

    let mut out = std::io::BufWriter::new(std::io::stdout().lock());
    if let Err(e) = print_metrics(&mut out, &decoded.metrics).and_then(|_| out.flush()) {
        tracing::error!(reason = ?e, "writing output failed");
        return std::process::ExitCode::FAILURE;
    }

    std::process::ExitCode::SUCCESS
}
