//! Terminal and JSON views of stat grids and season tables.

use crate::core::metrics::{BattingMetrics, PitchingMetrics};
use crate::core::season::SeasonTable;
use crate::core::tracker::DirtySlot;
use crate::errors::{AppError, AppResult};
use crate::models::stat_line::{BattingLine, PitchingLine, StatLine};
use crate::utils::formatting::{dirty, sentinel_aware};
use crate::utils::table::{Column, Table};
use serde::Serialize;

/// Derived metric columns shown after the counting fields.
pub trait MetricColumns: StatLine {
    type Metrics: Serialize;

    fn metrics(&self) -> Self::Metrics;
    fn metric_headers() -> &'static [&'static str];
    fn metric_cells(&self) -> Vec<String>;
}

impl MetricColumns for BattingLine {
    type Metrics = BattingMetrics;

    fn metrics(&self) -> BattingMetrics {
        BattingMetrics::of(self)
    }

    fn metric_headers() -> &'static [&'static str] {
        &["TB", "AVG", "OBP", "SLG", "OPS"]
    }

    fn metric_cells(&self) -> Vec<String> {
        let m = self.metrics();
        vec![
            m.total_bases.to_string(),
            m.avg.rate(),
            m.obp.rate(),
            m.slg.rate(),
            m.ops.rate(),
        ]
    }
}

impl MetricColumns for PitchingLine {
    type Metrics = PitchingMetrics;

    fn metrics(&self) -> PitchingMetrics {
        PitchingMetrics::of(self)
    }

    fn metric_headers() -> &'static [&'static str] {
        &["ERA", "WHIP", "K/9", "BB/9", "OAVG"]
    }

    fn metric_cells(&self) -> Vec<String> {
        let m = self.metrics();
        vec![
            m.era.fixed2(),
            m.whip.fixed2(),
            m.k9.fixed2(),
            m.bb9.fixed2(),
            m.opp_avg.rate(),
        ]
    }
}

fn field_columns<L: MetricColumns>(leading: Vec<Column>) -> Vec<Column> {
    let mut cols = leading;
    cols.extend(L::fields().iter().map(|f| Column::right(L::label(*f))));
    cols.extend(L::metric_headers().iter().map(|h| Column::right(h)));
    cols
}

fn value_cells<L: MetricColumns>(line: &L, edited: Option<&DirtySlot<L>>) -> Vec<String> {
    let mut cells: Vec<String> = L::fields()
        .iter()
        .map(|f| {
            let v = line.get(*f).to_string();
            match edited {
                Some(slot) if slot.fields.contains(f) => dirty(&v),
                _ => v,
            }
        })
        .collect();
    cells.extend(line.metric_cells().into_iter().map(sentinel_aware));
    cells
}

/// One game's grid: rows (edits shown in place) and a totals footer.
pub fn grid_table<L: MetricColumns>(
    rows: &[&L],
    totals: &L,
    slot: Option<&DirtySlot<L>>,
    separator_char: &str,
) -> String {
    let mut table = Table::new(field_columns::<L>(vec![
        Column::right("ID"),
        Column::left("Player"),
    ]));

    for row in rows {
        let edited = slot.filter(|s| s.row_id == row.stat_id());
        let mut cells = vec![row.stat_id().to_string(), row.player_name().to_string()];
        cells.extend(value_cells(*row, edited));
        table.add_row(cells);
    }

    let mut footer = vec![String::new(), totals.player_name().to_string()];
    footer.extend(value_cells(totals, None));
    table.add_footer(footer);

    table.render(separator_char)
}

pub fn season_grid<L: MetricColumns>(season: &SeasonTable<L>, separator_char: &str) -> String {
    let mut table = Table::new(field_columns::<L>(vec![
        Column::left("Player"),
        Column::right("G"),
    ]));

    for p in &season.players {
        let mut cells = vec![p.line.player_name().to_string(), p.games.to_string()];
        cells.extend(value_cells(&p.line, None));
        table.add_row(cells);
    }

    let mut footer = vec![season.totals.player_name().to_string(), String::new()];
    footer.extend(value_cells(&season.totals, None));
    table.add_footer(footer);

    table.render(separator_char)
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct LineView<'a, L: MetricColumns> {
    #[serde(flatten)]
    pub line: &'a L,
    pub metrics: L::Metrics,
}

impl<'a, L: MetricColumns> LineView<'a, L> {
    pub fn of(line: &'a L) -> Self {
        Self {
            line,
            metrics: line.metrics(),
        }
    }
}

#[derive(Serialize)]
struct GridView<'a, L: MetricColumns> {
    game_id: i64,
    kind: &'static str,
    stats: Vec<LineView<'a, L>>,
    totals: LineView<'a, L>,
}

#[derive(Serialize)]
struct SeasonPlayerView<'a, L: MetricColumns> {
    games: u32,
    #[serde(flatten)]
    line: LineView<'a, L>,
}

#[derive(Serialize)]
struct SeasonView<'a, L: MetricColumns> {
    kind: &'static str,
    players: Vec<SeasonPlayerView<'a, L>>,
    totals: LineView<'a, L>,
}

fn to_json<T: Serialize>(value: &T) -> AppResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| AppError::Other(format!("JSON: {e}")))
}

pub fn grid_json<L: MetricColumns>(game_id: i64, rows: &[&L], totals: &L) -> AppResult<String> {
    to_json(&GridView {
        game_id,
        kind: L::KIND,
        stats: rows.iter().map(|r| LineView::of(*r)).collect(),
        totals: LineView::of(totals),
    })
}

pub fn season_json<L: MetricColumns>(season: &SeasonTable<L>) -> AppResult<String> {
    to_json(&SeasonView {
        kind: L::KIND,
        players: season
            .players
            .iter()
            .map(|p| SeasonPlayerView {
                games: p.games,
                line: LineView::of(&p.line),
            })
            .collect(),
        totals: LineView::of(&season.totals),
    })
}
