//! Journal service: the inbound event surface for a presentation layer.
//!
//! Each UI event maps to one method. Nothing is pushed back to the caller;
//! after a mutation the caller asks for a fresh [`JournalView`].

use super::error::JournalError;
use super::ledger::LedgerStore;
use super::pnl::preview_result;
use super::query::{query, Category};
use super::stats::{ChartData, Stats};
use super::trade::{Direction, TradeDraft, TradeRecord};
use crate::ports::blob_port::BlobPort;

/// Raw numeric form fields for a live P/L preview.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewFields {
    pub direction: Direction,
    pub size: Option<f64>,
    pub entry: Option<f64>,
    pub exit: Option<f64>,
    pub fee: Option<f64>,
}

/// Everything the presentation layer renders.
#[derive(Debug, Clone, PartialEq)]
pub struct JournalView {
    /// Filtered table rows, most recent first.
    pub rows: Vec<TradeRecord>,
    /// Summary over the whole ledger, independent of the filter.
    pub stats: Stats,
    pub chart: ChartData,
}

impl JournalView {
    pub fn compute(records: &[TradeRecord], search: &str, category: Category) -> Self {
        JournalView {
            rows: query(records, search, category).into_iter().cloned().collect(),
            stats: Stats::compute(records),
            chart: ChartData::compute(records),
        }
    }
}

pub struct Journal<B: BlobPort> {
    store: LedgerStore<B>,
    search: String,
    category: Category,
}

impl<B: BlobPort> Journal<B> {
    pub fn new(store: LedgerStore<B>) -> Self {
        Journal {
            store,
            search: String::new(),
            category: Category::All,
        }
    }

    pub fn store(&self) -> &LedgerStore<B> {
        &self.store
    }

    pub fn submit(&self, draft: TradeDraft) -> Result<TradeRecord, JournalError> {
        self.store.insert(draft)
    }

    pub fn import(&self, drafts: Vec<TradeDraft>) -> Result<Vec<TradeRecord>, JournalError> {
        self.store.import(drafts)
    }

    pub fn preview(&self, fields: PreviewFields) -> Option<f64> {
        preview_result(fields.direction, fields.size, fields.entry, fields.exit, fields.fee)
    }

    /// Form contents for the edit dialog, if the trade exists.
    pub fn edit(&self, id: &str) -> Option<TradeDraft> {
        self.store.get(id).map(|r| r.to_draft())
    }

    pub fn update(&self, id: &str, draft: TradeDraft) -> Result<bool, JournalError> {
        self.store.replace(id, draft)
    }

    pub fn recompute(&self, id: &str) -> Result<Option<TradeRecord>, JournalError> {
        self.store.recompute(id)
    }

    /// Callers confirm with the user before calling this.
    pub fn delete(&self, id: &str) -> Result<bool, JournalError> {
        self.store.remove(id)
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    pub fn set_category(&mut self, category: Category) {
        self.category = category;
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Full re-derivation from the persisted ledger.
    pub fn view(&self) -> JournalView {
        JournalView::compute(&self.store.load(), &self.search, self.category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory_blob_adapter::MemoryBlobAdapter;
    use crate::domain::trade::parse_trade_date;

    fn journal() -> Journal<MemoryBlobAdapter> {
        Journal::new(LedgerStore::new(MemoryBlobAdapter::new()))
    }

    fn draft(symbol: &str, date: &str, direction: Direction, exit: f64) -> TradeDraft {
        TradeDraft::new(parse_trade_date(date).unwrap(), symbol, direction, 1.0, 100.0, exit)
    }

    #[test]
    fn empty_view() {
        let view = journal().view();
        assert!(view.rows.is_empty());
        assert_eq!(view.stats.total_trades, 0);
        assert!(view.chart.cumulative.is_empty());
    }

    #[test]
    fn filter_narrows_rows_but_not_stats() {
        let mut journal = journal();
        journal.submit(draft("aapl", "2024-01-01", Direction::Long, 110.0)).unwrap();
        journal.submit(draft("tsla", "2024-01-02", Direction::Long, 90.0)).unwrap();
        journal.submit(draft("aapl", "2024-01-03", Direction::Short, 95.0)).unwrap();

        journal.set_search("AAPL");
        journal.set_category(Category::Short);
        let view = journal.view();

        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].direction, Direction::Short);
        assert_eq!(view.stats.total_trades, 3);
        assert_eq!(view.chart.wins, 2);
        assert_eq!(view.chart.losses, 1);
    }

    #[test]
    fn edit_update_delete_cycle() {
        let journal = journal();
        let record = journal.submit(draft("aapl", "2024-01-01", Direction::Long, 110.0)).unwrap();

        let mut form = journal.edit(&record.id).unwrap();
        form.notes = "revised".into();
        form.result = None;
        assert!(journal.update(&record.id, form).unwrap());
        assert_eq!(journal.view().rows[0].notes, "revised");

        assert!(journal.delete(&record.id).unwrap());
        assert!(journal.edit(&record.id).is_none());
        assert!(journal.view().rows.is_empty());
    }

    #[test]
    fn preview_follows_formula() {
        let fields = PreviewFields {
            direction: Direction::Short,
            size: Some(5.0),
            entry: Some(50.0),
            exit: Some(40.0),
            fee: Some(1.0),
        };
        assert_eq!(journal().preview(fields), Some(49.0));
        assert_eq!(journal().preview(PreviewFields { size: None, ..fields }), None);
    }
}
