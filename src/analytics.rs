use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Oldest entries are discarded once a buffer grows past this.
pub const ANALYTICS_BUFFER_CAPACITY: usize = 10_000;

/// How many pages/referrers the summary reports.
const TOP_ENTRIES: usize = 10;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageViewData {
    pub url: String,
    pub referrer: Option<String>,
    pub user_agent: Option<String>,
    pub screen_width: Option<u32>,
    pub screen_height: Option<u32>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventData {
    pub category: String,
    pub action: String,
    pub label: Option<String>,
    pub value: Option<i64>,
    pub url: String,
}

#[derive(Debug, Clone)]
struct PageView {
    #[allow(dead_code)]
    id: Uuid,
    recorded_at: DateTime<Utc>,
    visitor_key: String,
    data: PageViewData,
}

#[derive(Debug, Clone)]
struct TrackedEvent {
    #[allow(dead_code)]
    id: Uuid,
    recorded_at: DateTime<Utc>,
    data: EventData,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct FrequencyEntry {
    pub key: String,
    pub count: u64,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DailyCounts {
    pub date: NaiveDate,
    pub page_views: u64,
    pub events: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub total_page_views: u64,
    pub total_events: u64,
    pub unique_visitors: u64,
    pub top_pages: Vec<FrequencyEntry>,
    pub top_referrers: Vec<FrequencyEntry>,
    pub events_by_category: Vec<FrequencyEntry>,
    pub daily: Vec<DailyCounts>,
}

/// Ephemeral telemetry buffer, not a system of record.
///
/// Page views and custom events live in two independently-capped in-memory
/// buffers; nothing survives a restart. Writes truncate oldest-first once a
/// buffer exceeds its capacity. Reads snapshot each buffer separately, so a
/// summary taken during concurrent writes is eventually consistent rather
/// than transactionally isolated.
pub struct AnalyticsStore {
    capacity: usize,
    page_views: Mutex<Vec<PageView>>,
    events: Mutex<Vec<TrackedEvent>>,
}

impl Default for AnalyticsStore {
    fn default() -> Self {
        Self::new(ANALYTICS_BUFFER_CAPACITY)
    }
}

impl AnalyticsStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            page_views: Mutex::new(Vec::new()),
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn record_page_view(&self, visitor_key: String, data: PageViewData) -> Uuid {
        let id = Uuid::new_v4();
        let mut page_views = self
            .page_views
            .lock()
            .expect("Analytics page view mutex was poisoned.");

        page_views.push(PageView {
            id,
            recorded_at: Utc::now(),
            visitor_key,
            data,
        });
        truncate_oldest(&mut page_views, self.capacity);

        id
    }

    pub fn record_event(&self, data: EventData) -> Uuid {
        let id = Uuid::new_v4();
        let mut events = self
            .events
            .lock()
            .expect("Analytics event mutex was poisoned.");

        events.push(TrackedEvent {
            id,
            recorded_at: Utc::now(),
            data,
        });
        truncate_oldest(&mut events, self.capacity);

        id
    }

    pub fn summarize(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> AnalyticsSummary {
        let page_views: Vec<PageView> = {
            let guard = self
                .page_views
                .lock()
                .expect("Analytics page view mutex was poisoned.");
            guard
                .iter()
                .filter(|view| start <= view.recorded_at && view.recorded_at <= end)
                .cloned()
                .collect()
        };
        let events: Vec<TrackedEvent> = {
            let guard = self
                .events
                .lock()
                .expect("Analytics event mutex was poisoned.");
            guard
                .iter()
                .filter(|event| start <= event.recorded_at && event.recorded_at <= end)
                .cloned()
                .collect()
        };

        let unique_visitors = page_views
            .iter()
            .map(|view| view.visitor_key.as_str())
            .collect::<HashSet<_>>()
            .len() as u64;

        let mut pages = HashMap::new();
        let mut referrers = HashMap::new();
        for view in &page_views {
            *pages.entry(view.data.url.clone()).or_insert(0u64) += 1;
            if let Some(referrer) = view.data.referrer.as_deref().filter(|r| !r.is_empty()) {
                *referrers.entry(referrer.to_owned()).or_insert(0u64) += 1;
            }
        }

        let mut categories = HashMap::new();
        for event in &events {
            *categories.entry(event.data.category.clone()).or_insert(0u64) += 1;
        }

        let mut daily_page_views = HashMap::new();
        for view in &page_views {
            *daily_page_views
                .entry(view.recorded_at.date_naive())
                .or_insert(0u64) += 1;
        }
        let mut daily_events = HashMap::new();
        for event in &events {
            *daily_events
                .entry(event.recorded_at.date_naive())
                .or_insert(0u64) += 1;
        }

        AnalyticsSummary {
            total_page_views: page_views.len() as u64,
            total_events: events.len() as u64,
            unique_visitors,
            top_pages: by_descending_count(pages, Some(TOP_ENTRIES)),
            top_referrers: by_descending_count(referrers, Some(TOP_ENTRIES)),
            events_by_category: by_descending_count(categories, None),
            daily: zero_filled_days(start, end, &daily_page_views, &daily_events),
        }
    }
}

fn truncate_oldest<T>(buffer: &mut Vec<T>, capacity: usize) {
    if buffer.len() > capacity {
        let excess = buffer.len() - capacity;
        buffer.drain(..excess);
    }
}

fn by_descending_count(counts: HashMap<String, u64>, limit: Option<usize>) -> Vec<FrequencyEntry> {
    let mut entries: Vec<FrequencyEntry> = counts
        .into_iter()
        .map(|(key, count)| FrequencyEntry { key, count })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
    if let Some(limit) = limit {
        entries.truncate(limit);
    }
    entries
}

fn zero_filled_days(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    page_views: &HashMap<NaiveDate, u64>,
    events: &HashMap<NaiveDate, u64>,
) -> Vec<DailyCounts> {
    let mut daily = Vec::new();
    let mut date = start.date_naive();
    let last = end.date_naive();

    while date <= last {
        daily.push(DailyCounts {
            date,
            page_views: page_views.get(&date).copied().unwrap_or(0),
            events: events.get(&date).copied().unwrap_or(0),
        });
        date = match date.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    daily
}
