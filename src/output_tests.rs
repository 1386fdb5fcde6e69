use super::{BufferedSink, ConsoleSink, ProgressSink};

#[test]
fn progress_lines_follow_fixed_format() {
    let mut sink = BufferedSink::default();

    sink.package("acme/ui");
    sink.file("dist/ui.css");
    sink.directory("dist/img/");
    sink.directory("fonts");

    assert_eq!(
        sink.lines,
        vec![
            "Manage assets for package acme/ui",
            "  - file dist/ui.css",
            "  - directory dist/img/",
            "  - directory fonts/",
        ]
    );
}

#[test]
fn console_sink_write_never_panics() {
    let mut sink = ConsoleSink;
    sink.package("acme/ui");
    sink.write_line("");
}
