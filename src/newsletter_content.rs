use crate::domain::NewsArticle;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use voca_rs::escape::escape_html;

pub const WELCOME_SUBJECT: &str = "Welcome to FootStats Newsletter!";

const WELCOME_TEXT: &str = "Thank you for subscribing to our newsletter. You'll receive the latest football news and updates straight to your inbox.";

const NEWSLETTER_STYLE: &str = r#"
      body { font-family: Arial, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; }
      .header { background-color: #059669; color: white; padding: 20px; text-align: center; }
      .news-item { margin-bottom: 30px; border-bottom: 1px solid #eee; padding-bottom: 20px; }
      .news-item img { max-width: 100%; height: auto; margin-bottom: 10px; }
      .news-item h2 { margin: 10px 0; color: #1a1a1a; }
      .news-item .source { color: #666; font-size: 0.9em; }
      .news-item .description { margin: 10px 0; }
      .news-item .read-more { color: #059669; text-decoration: none; }
      .footer { text-align: center; padding: 20px; font-size: 0.8em; color: #666; }"#;

pub fn newsletter_subject(today: NaiveDate) -> String {
    format!("FootStats Daily Newsletter - {}", long_date(today))
}

/// Renders the one HTML document every subscriber of a dispatch run receives.
pub fn render_newsletter(articles: &[NewsArticle], today: NaiveDate) -> String {
    let items: String = articles.iter().map(render_article).collect();

    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <style>{style}
    </style>
  </head>
  <body>
    <div class="header">
      <h1>FootStats Daily Newsletter</h1>
      <p>{today}</p>
    </div>
{items}
    <div class="footer">
      <p>You're receiving this email because you subscribed to FootStats Newsletter.</p>
      <p>To unsubscribe, <a href="[Unsubscribe_Link]">click here</a></p>
    </div>
  </body>
</html>
"#,
        style = NEWSLETTER_STYLE,
        today = long_date(today),
        items = items,
    )
}

fn render_article(article: &NewsArticle) -> String {
    let title = escape_html(&article.title);
    let image = match article.image_url.as_deref() {
        Some(src) if !src.trim().is_empty() => {
            format!(r#"<img src="{}" alt="{}">"#, escape_html(src), title)
        }
        _ => String::new(),
    };

    format!(
        r#"    <div class="news-item">
      {image}
      <h2>{title}</h2>
      <div class="source">Source: {source} | {published}</div>
      <div class="description">{description}</div>
      <a href="{url}" class="read-more">Read more →</a>
    </div>
"#,
        image = image,
        title = title,
        source = escape_html(article.source_name()),
        published = short_timestamp(article.published_at),
        description = escape_html(article.description.as_deref().unwrap_or_default()),
        url = escape_html(&article.url),
    )
}

pub fn welcome_html() -> String {
    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h1 style="color: #059669;">{}</h1>
  <p>{}</p>
  <p>Stay tuned for:</p>
  <ul>
    <li>Match results and analysis</li>
    <li>Transfer news and rumors</li>
    <li>Player statistics and insights</li>
    <li>Exclusive content and more!</li>
  </ul>
</div>"#,
        WELCOME_SUBJECT, WELCOME_TEXT
    )
}

pub fn welcome_text() -> &'static str {
    WELCOME_TEXT
}

// "October 17th, 2026"
fn long_date(date: NaiveDate) -> String {
    format!(
        "{} {}{}, {}",
        date.format("%B"),
        date.day(),
        ordinal_suffix(date.day()),
        date.year()
    )
}

// "Oct 17th, 3:04 PM"
fn short_timestamp(timestamp: DateTime<Utc>) -> String {
    format!(
        "{} {}{}, {}",
        timestamp.format("%b"),
        timestamp.day(),
        ordinal_suffix(timestamp.day()),
        timestamp.format("%-I:%M %p")
    )
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}
