//! Markdown rendering for command output.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use trendforge_core::{ChannelProfile, TrendBundle, TrendSource};
use trendforge_pipeline::PipelineResult;

fn push_list(out: &mut String, items: &[String], empty_note: &str) {
    if items.is_empty() {
        let _ = writeln!(out, "_{empty_note}_");
        return;
    }
    for item in items {
        let _ = writeln!(out, "- {item}");
    }
}

/// The four pipeline artifacts as Markdown sections.
pub(crate) fn result_markdown(
    niche: &str,
    result: &PipelineResult,
    generated: DateTime<Utc>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Content Ideas: {niche}");
    let _ = writeln!(out);
    let _ = writeln!(out, "**Generated**: {}", generated.format("%Y-%m-%d %H:%M UTC"));
    let _ = writeln!(out);

    let _ = writeln!(out, "## 📊 Trend Summary");
    let _ = writeln!(out);
    if result.trend_summary.is_empty() {
        let _ = writeln!(out, "_No summary returned._");
    } else {
        let _ = writeln!(out, "{}", result.trend_summary);
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "## 🎬 Content Plan");
    let _ = writeln!(out);
    for (i, idea) in result.content_plan.iter().enumerate() {
        let _ = writeln!(out, "{}. {idea}", i + 1);
    }
    if result.content_plan.is_empty() {
        let _ = writeln!(out, "_No ideas returned._");
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "## 🧠 Optimized Titles");
    let _ = writeln!(out);
    push_list(&mut out, &result.optimized_titles, "No titles returned.");
    let _ = writeln!(out);

    let _ = writeln!(out, "## 🎨 Thumbnail Ideas");
    let _ = writeln!(out);
    push_list(&mut out, &result.thumbnail_ideas, "No thumbnail ideas returned.");
    out
}

pub(crate) fn trends_markdown(niche: &str, trends: &TrendBundle) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Trends: {niche}");
    for source in [TrendSource::Reddit, TrendSource::GoogleTrends, TrendSource::YouTube] {
        let text = trends.text_for(source);
        let _ = writeln!(out);
        let _ = writeln!(out, "## {}", source.label());
        let _ = writeln!(out);
        if text.trim().is_empty() {
            let _ = writeln!(out, "_Nothing fetched._");
        } else {
            let _ = writeln!(out, "{text}");
        }
    }
    out
}

pub(crate) fn channel_markdown(profile: &ChannelProfile) -> String {
    let mut out = String::new();
    if profile.is_empty() {
        let _ = writeln!(out, "_No channel information could be extracted._");
        return out;
    }

    let _ = writeln!(out, "# Channel");
    let _ = writeln!(out);
    if let Some(id) = &profile.channel_id {
        let _ = writeln!(out, "**Channel ID**: {id}");
        let _ = writeln!(out);
    }
    let _ = writeln!(out, "{}", profile.description.trim());

    if !profile.recent_videos.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "## Recent Uploads");
        let _ = writeln!(out);
        let _ = writeln!(out, "| Title | Views | URL |");
        let _ = writeln!(out, "|-------|-------|-----|");
        for video in &profile.recent_videos {
            let views = video
                .view_count
                .map_or_else(|| "\u{2014}".to_string(), |v| v.to_string());
            let _ = writeln!(out, "| {} | {views} | {} |", video.title, video.url);
        }
    }
    out
}
