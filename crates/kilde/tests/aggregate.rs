use async_trait::async_trait;
use kilde::aggregate::{aggregate, partition_hls_last};
use kilde::{restrict, Format, Prober};

fn format(format_id: &str) -> Format {
    Format {
        url: format!("https://cdn.example/{format_id}"),
        format_id: format_id.to_string(),
        ..Default::default()
    }
}

struct KeepAll;

#[async_trait]
impl Prober for KeepAll {
    async fn is_reachable(&self, _format: &Format) -> bool {
        true
    }
}

/// Drops every format whose url contains the needle.
struct DropMatching(&'static str);

#[async_trait]
impl Prober for DropMatching {
    async fn is_reachable(&self, format: &Format) -> bool {
        !format.url.contains(self.0)
    }
}

#[tokio::test]
async fn hls_formats_sort_last_and_keep_relative_order() {
    let input = vec![
        format("HLS-1500"),
        format("HDS-500"),
        format("-750"),
        format("HLS-300"),
        format("HDS-SignLanguage-200"),
    ];

    let ordered = aggregate(input, &KeepAll).await;
    let ids: Vec<_> = ordered.iter().map(|f| f.format_id.as_str()).collect();
    assert_eq!(
        ids,
        ["HDS-500", "-750", "HDS-SignLanguage-200", "HLS-1500", "HLS-300"]
    );
}

#[tokio::test]
async fn every_non_hls_format_precedes_every_hls_format() {
    let input = vec![
        format("HLS-1"),
        format("a"),
        format("HLS-2"),
        format("b"),
        format("HLSX"),
    ];

    let ordered = aggregate(input, &KeepAll).await;
    let first_hls = ordered
        .iter()
        .position(|f| f.format_id.starts_with("HLS-"))
        .unwrap();
    assert!(ordered[first_hls..]
        .iter()
        .all(|f| f.format_id.starts_with("HLS-")));
    assert!(ordered[..first_hls]
        .iter()
        .all(|f| !f.format_id.starts_with("HLS-")));

    // Only the literal "HLS-" prefix moves a format to the back.
    assert_eq!(ordered[2].format_id, "HLSX");
}

#[test]
fn partition_is_stable() {
    let input = vec![format("x"), format("HLS-2"), format("y"), format("HLS-1")];
    let (rest, hls) = partition_hls_last(input);

    let rest: Vec<_> = rest.iter().map(|f| f.format_id.as_str()).collect();
    let hls: Vec<_> = hls.iter().map(|f| f.format_id.as_str()).collect();
    assert_eq!(rest, ["x", "y"]);
    assert_eq!(hls, ["HLS-2", "HLS-1"]);
}

#[tokio::test]
async fn unreachable_non_hls_formats_are_dropped() {
    let input = vec![format("HDS-500"), format("-dead"), format("HLS-300")];

    let ordered = aggregate(input, &DropMatching("dead")).await;
    let ids: Vec<_> = ordered.iter().map(|f| f.format_id.as_str()).collect();
    assert_eq!(ids, ["HDS-500", "HLS-300"]);
}

#[tokio::test]
async fn hls_formats_are_not_probed() {
    let input = vec![format("HLS-300")];

    // A prober that would drop everything must not touch the HLS partition.
    let ordered = aggregate(input, &DropMatching("cdn.example")).await;
    assert_eq!(ordered.len(), 1);
}

#[test]
fn restriction_verdict() {
    assert!(restrict::detect(&[], true));
    assert!(!restrict::detect(&[], false));
    assert!(!restrict::detect(&[format("HDS-500")], true));
}
