//! Plain-text rendering of a [`Frame`].

use std::fmt::Write;

use ap_app::view_model::{
    ChartView, CreatePostScreen, DashboardScreen, Header, PostDetailScreen, PostListScreen,
    ResearchTab, ResearchView, TodoListScreen,
};
use ap_app::{Frame, Screen};
use ap_core::markdown::{Block, Inline};
use ap_core::market::{Direction, TickerItem};

const RULE: &str = "----------------------------------------------------------------";
const BAR_WIDTH: f64 = 30.0;

/// Render the whole frame. `fmt::Write` into a `String` cannot fail, so
/// write results are ignored.
pub fn render_frame(frame: &Frame) -> String {
    let mut out = String::new();
    render_header(&mut out, &frame.header);
    if let Some(ticker) = &frame.ticker {
        render_ticker(&mut out, ticker);
    }
    let _ = writeln!(out, "{RULE}");
    match &frame.screen {
        Screen::Dashboard(screen) => render_dashboard(&mut out, screen),
        Screen::Posts(screen) => render_post_list(&mut out, screen),
        Screen::PostDetail(Some(screen)) => render_post_detail(&mut out, screen),
        Screen::PostDetail(None) => {
            let _ = writeln!(out, "Post not found.");
        }
        Screen::CreatePost(screen) => render_create_post(&mut out, screen),
        Screen::TodoList(screen) => render_todos(&mut out, screen),
    }
    if let Some(research) = &frame.research {
        render_research(&mut out, research);
    }
    if let Some(chart) = &frame.chart {
        render_chart(&mut out, chart);
    }
    out
}

fn render_header(out: &mut String, header: &Header) {
    let nav: Vec<String> = header
        .nav
        .iter()
        .map(|entry| {
            if entry.active {
                format!("[{}]", entry.label)
            } else {
                entry.label.to_string()
            }
        })
        .collect();
    let _ = writeln!(
        out,
        "{}  |  {}  |  {}",
        header.title,
        nav.join("  "),
        header.user_name
    );
}

fn ticker_entry(item: &TickerItem) -> String {
    let arrow = match item.direction {
        Direction::Up => "▲",
        Direction::Down => "▼",
    };
    format!("{} {} {} {}", item.symbol, item.price, arrow, item.change)
}

fn render_ticker(out: &mut String, ticker: &[TickerItem]) {
    let entries: Vec<String> = ticker.iter().map(ticker_entry).collect();
    let _ = writeln!(out, "{}", entries.join("   "));
}

fn render_dashboard(out: &mut String, screen: &DashboardScreen) {
    let _ = writeln!(out, "{}", screen.greeting);
    let _ = writeln!(out);
    for card in &screen.stats {
        let _ = writeln!(out, "  {:<20} {}", card.label, card.value);
    }
    if let Some(latest) = &screen.latest {
        let _ = writeln!(out);
        let _ = writeln!(out, "Latest post");
        let _ = writeln!(out, "  1. {}", latest.title);
        let _ = writeln!(
            out,
            "     {} · {} views · {}",
            latest.category, latest.views, latest.date
        );
        let _ = writeln!(out, "     {}", latest.snippet);
    }
    if !screen.recent.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Recent posts");
        for (i, row) in screen.recent.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {}. {} ({}, {} views)",
                i + 2,
                row.title,
                row.category,
                row.views
            );
        }
    }
    if !screen.categories.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Posts per category");
        for bar in &screen.categories {
            let width = (bar.ratio * BAR_WIDTH).round() as usize;
            let _ = writeln!(
                out,
                "  {:<24} {} {}",
                bar.name,
                "#".repeat(width.max(1)),
                bar.count
            );
        }
    }
}

fn render_post_list(out: &mut String, screen: &PostListScreen) {
    let chips: Vec<String> = screen
        .filters
        .iter()
        .map(|chip| {
            if chip.active {
                format!("[{}]", chip.filter.label())
            } else {
                chip.filter.label().to_string()
            }
        })
        .collect();
    let _ = writeln!(out, "Filter: {}", chips.join("  "));
    let _ = writeln!(out);
    if let Some(message) = screen.empty_message {
        let _ = writeln!(out, "{message}");
        return;
    }
    for (i, card) in screen.cards.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", i + 1, card.title);
        let _ = writeln!(
            out,
            "   {} · {} · {} views",
            card.category, card.date, card.views
        );
        let _ = writeln!(out, "   {}", card.snippet);
    }
}

fn inline_text(inline: &Inline) -> String {
    match inline {
        Inline::Text(text) => text.clone(),
        Inline::Strong(text) => format!("*{text}*"),
        Inline::Emphasis(text) => format!("_{text}_"),
    }
}

fn render_post_detail(out: &mut String, screen: &PostDetailScreen) {
    let _ = writeln!(out, "{}", screen.title);
    let _ = writeln!(
        out,
        "{} · {} views · {}",
        screen.category, screen.views, screen.date
    );
    let _ = writeln!(out, "{}", screen.image_url);
    let _ = writeln!(out);
    for block in &screen.body {
        match block {
            Block::Heading { level, text } => {
                let underline = if *level <= 1 { '=' } else { '-' };
                let _ = writeln!(out, "{text}");
                let _ = writeln!(
                    out,
                    "{}",
                    underline.to_string().repeat(text.chars().count())
                );
            }
            Block::Paragraph { inlines } => {
                let line: String = inlines.iter().map(inline_text).collect();
                let _ = writeln!(out, "{line}");
            }
            Block::Break => {
                let _ = writeln!(out);
            }
        }
    }
}

fn flag(busy: bool, enabled: bool) -> &'static str {
    if busy {
        " (working...)"
    } else if enabled {
        ""
    } else {
        " (unavailable)"
    }
}

fn render_create_post(out: &mut String, screen: &CreatePostScreen) {
    let _ = writeln!(out, "Create a new post");
    let _ = writeln!(out);
    let _ = writeln!(out, "Topic:     {}", screen.topic);
    let _ = writeln!(
        out,
        "  ideas{}",
        flag(screen.generating_ideas, screen.can_generate_ideas)
    );
    for (i, idea) in screen.ideas.iter().enumerate() {
        let _ = writeln!(out, "    {}. {}", i + 1, idea);
    }
    let _ = writeln!(out, "Title:     {}", screen.title);
    let _ = writeln!(out, "Category:  {}", screen.category);
    let _ = writeln!(out, "Image URL: {}", screen.image_url);
    let _ = writeln!(
        out,
        "  write{}   image{}",
        flag(screen.generating_content, screen.can_write_content),
        flag(screen.generating_image, screen.can_generate_image)
    );
    let _ = writeln!(out, "Content:");
    for line in screen.content.lines() {
        let _ = writeln!(out, "  {line}");
    }
    if let Some(error) = &screen.error {
        let _ = writeln!(out);
        let _ = writeln!(out, "! {error}");
    }
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "save{}   cancel",
        if screen.can_save { "" } else { " (fill every field)" }
    );
}

fn render_todos(out: &mut String, screen: &TodoListScreen) {
    let _ = writeln!(out, "To-Do List ({} remaining)", screen.remaining);
    let _ = writeln!(out);
    if screen.items.is_empty() {
        let _ = writeln!(out, "Nothing to do.");
    }
    for (i, item) in screen.items.iter().enumerate() {
        let mark = if item.completed { "x" } else { " " };
        let _ = writeln!(out, "{}. [{}] {}", i + 1, mark, item.text);
    }
}

fn render_research(out: &mut String, view: &ResearchView) {
    let _ = writeln!(out, "{RULE}");
    let tabs = match view.tab {
        ResearchTab::Research => "[Research]  History",
        ResearchTab::History => "Research  [History]",
    };
    let _ = writeln!(out, "AI Research  {tabs}");
    match view.tab {
        ResearchTab::Research => {
            let _ = writeln!(out, "Query: {}", view.query);
            if view.loading {
                let _ = writeln!(out, "Searching...");
            }
            if let Some(error) = &view.error {
                let _ = writeln!(out, "! {error}");
            }
            if let Some(result) = &view.current {
                let _ = writeln!(out);
                let _ = writeln!(out, "{}", result.summary);
                if !result.sources.is_empty() {
                    let _ = writeln!(out);
                    let _ = writeln!(out, "Sources:");
                    for source in &result.sources {
                        let _ = writeln!(out, "  - {} <{}>", source.title, source.uri);
                    }
                }
            }
        }
        ResearchTab::History => {
            if view.history.is_empty() {
                let _ = writeln!(out, "No research history yet.");
            }
            for (i, row) in view.history.iter().enumerate() {
                let _ = writeln!(out, "{}. {}", i + 1, row.query);
            }
        }
    }
}

fn render_chart(out: &mut String, chart: &ChartView) {
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(
        out,
        "{} ({})  {}",
        chart.ticker.name,
        chart.ticker.symbol,
        ticker_entry(&chart.ticker)
    );
    if chart.loading {
        let _ = writeln!(out, "Loading chart...");
        return;
    }
    match &chart.geometry {
        Some(geometry) => {
            let trend = if geometry.is_rising() { "up" } else { "down" };
            let _ = writeln!(
                out,
                "30d range {:.2} .. {:.2}, trend {}, {} points",
                geometry.min_price,
                geometry.max_price,
                trend,
                geometry.points.len()
            );
        }
        None => {
            let _ = writeln!(out, "No chart data available.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ap_app::view_model::{compose_frame, PostsSnapshot, ViewState};
    use ap_core::ids::CoinId;
    use ap_core::market::CryptoData;
    use ap_core::navigation::{RouteState, View};
    use ap_core::post::Post;
    use ap_core::user::User;
    use std::sync::Arc;

    fn post(id: &str, category: &str) -> Post {
        Post {
            id: id.into(),
            title: format!("Title {id}"),
            content: "# Heading\nSome **bold** text".into(),
            image_url: "https://img".into(),
            created_at: "2024-05-01T10:00:00.000Z".into(),
            category: category.into(),
            views: 7,
        }
    }

    fn frame_for(state: &ViewState) -> String {
        render_frame(&compose_frame(state, &User::development_admin()))
    }

    #[test]
    fn test_empty_dashboard_has_greeting_and_no_ticker() {
        let text = frame_for(&ViewState::default());
        assert!(text.contains("Welcome back, Admin!"));
        assert!(text.contains("[Dashboard]"));
        assert!(!text.contains("▲"));
    }

    #[test]
    fn test_ticker_line_shows_symbol_and_direction() {
        let state = ViewState {
            market: Arc::new(vec![CryptoData {
                id: CoinId::from("bitcoin"),
                name: "Bitcoin".into(),
                symbol: "BTC".into(),
                price: 1234.5,
                change24h: -1.5,
                image: String::new(),
            }]),
            ..ViewState::default()
        };
        let text = frame_for(&state);
        assert!(text.contains("BTC $1,234.50 ▼"));
    }

    #[test]
    fn test_post_list_numbers_cards() {
        let state = ViewState {
            posts: PostsSnapshot::new(vec![post("a", "AI"), post("b", "Web")]),
            route: RouteState {
                view: View::Posts,
                selected_post_id: None,
            },
            ..ViewState::default()
        };
        let text = frame_for(&state);
        assert!(text.contains("Filter: [All]  AI  Web"));
        assert!(text.contains("1. Title a"));
        assert!(text.contains("2. Title b"));
    }

    #[test]
    fn test_post_detail_renders_markdown_as_text() {
        let state = ViewState {
            posts: PostsSnapshot::new(vec![post("a", "AI")]),
            route: RouteState {
                view: View::PostDetail,
                selected_post_id: Some("a".into()),
            },
            ..ViewState::default()
        };
        let text = frame_for(&state);
        assert!(text.contains("Heading\n======="));
        assert!(text.contains("Some *bold* text"));
    }

    #[test]
    fn test_missing_post_detail() {
        let state = ViewState {
            route: RouteState {
                view: View::PostDetail,
                selected_post_id: Some("gone".into()),
            },
            ..ViewState::default()
        };
        assert!(frame_for(&state).contains("Post not found."));
    }

    #[test]
    fn test_research_panel_is_appended_when_open() {
        let state = ViewState {
            research_open: true,
            ..ViewState::default()
        };
        let text = frame_for(&state);
        assert!(text.contains("AI Research  [Research]  History"));
    }
}
