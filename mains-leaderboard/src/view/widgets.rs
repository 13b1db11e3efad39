use maud::{html, Markup, PreEscaped};

use crate::{
    dashboard::{
        rows::{LeaderboardRow, LeaderboardView, RecentView},
        shiny::{GifChoice, ShinyReveal},
        sort::ColumnKind,
        toggle::Metric,
        Features,
    },
    model::stats::{wire_date, LocationShare},
};

const TH: &str = "px-3 py-2 text-xs font-medium tracking-wider text-left text-gray-500 uppercase";
const GIF_CLASS: &str = "inline-block w-10 h-10 mr-2 pokemon-gif";
const GIF_CLASS_SHINY: &str = "inline-block w-10 h-10 mr-2 pokemon-gif shiny";
const TD: &str = "px-3 py-2 text-sm text-gray-900 whitespace-nowrap";

fn leaderboard_cell_id(row: &LeaderboardRow) -> String {
    format!("lb-since-{}", row.rank)
}

fn recent_cell_id(index: usize) -> String {
    format!("recent-since-{index}")
}

fn gif(choice: &GifChoice, name: &str) -> Markup {
    html! {
        img class=(if choice.shiny { GIF_CLASS_SHINY } else { GIF_CLASS }) src=(choice.url) alt=(name) loading="lazy";
    }
}

fn pokemon_name(name: &str, features: Features) -> Markup {
    html! {
        @if features.details_modal {
            a href="#" class="text-blue-600 hover:underline"
                hx-get={"/widgets/pokemon/"(urlencoding::encode(name))}
                hx-target="#modal"
                hx-swap="innerHTML" {
                (name)
            }
        } @else {
            (name)
        }
    }
}

/// Clicks that change session state queue behind the container's requests,
/// so responses land in click order and the last one wins.
fn queue_on(container: &str) -> String {
    format!("#{container}:queue all")
}

fn metric_header(id: &str, container: &str, metric: Metric, features: Features) -> Markup {
    html! {
        @if features.since_last_toggle {
            button type="button" class="uppercase hover:text-gray-900" title="Switch between runs and time"
                hx-post={"/widgets/"(container)"/toggle"}
                hx-sync=(queue_on(container))
                hx-swap="none" {
                span id=(id) { (metric.header()) }
            }
        } @else {
            span id=(id) { (metric.header()) }
        }
    }
}

fn sort_header(index: usize, kind: ColumnKind, view: &LeaderboardView) -> Markup {
    html! {
        th class={(TH) " cursor-pointer select-none hover:text-gray-900"}
            hx-post={"/widgets/leaderboard/sort/"(index)}
            hx-sync=(queue_on("leaderboard"))
            hx-target="#leaderboard"
            hx-swap="innerHTML" {
            (kind.label())
            @if let Some(direction) = view.sort.indicator(index) {
                " " (direction.arrow())
            }
        }
    }
}

/// The full leaderboard table in its current order.
pub fn leaderboard(view: &LeaderboardView, metric: Metric, features: Features) -> Markup {
    html! {
        div class="overflow-x-auto" {
            table class="min-w-full divide-y divide-gray-200" {
                thead class="bg-gray-50" {
                    tr {
                        @for (index, kind) in view.columns.iter().copied().enumerate() {
                            @if kind.is_sortable() {
                                (sort_header(index, kind, view))
                            } @else {
                                th class=(TH) {
                                    (metric_header("leaderboard-metric", "leaderboard", metric, features))
                                }
                            }
                        }
                    }
                }
                tbody class="bg-white divide-y divide-gray-200" {
                    @for row in &view.rows {
                        tr data-pokemon=(row.name) {
                            @for kind in view.columns.iter().copied() {
                                td class=(TD) {
                                    @match kind {
                                        ColumnKind::Rank => { (row.rank) }
                                        ColumnKind::Name => {
                                            (gif(&row.gif, &row.name))
                                            (pokemon_name(&row.name, features))
                                        }
                                        ColumnKind::Bst => { (row.bst) }
                                        ColumnKind::Count => { (row.count) }
                                        ColumnKind::LastRan => { (wire_date::format(row.last_ran)) }
                                        ColumnKind::SinceLast => {
                                            span id=(leaderboard_cell_id(row)) { (row.since_last.text(metric)) }
                                        }
                                    }
                                }
                            }
                        }
                    }
                    @if view.rows.is_empty() {
                        tr {
                            td class={(TD) " text-center text-gray-500"} colspan=(view.columns.len()) {
                                "No encounters logged yet."
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Out-of-band swaps that rewrite only the since-last header and cells.
pub fn leaderboard_metric(view: &LeaderboardView, metric: Metric) -> Markup {
    html! {
        span id="leaderboard-metric" hx-swap-oob="true" { (metric.header()) }
        @for row in &view.rows {
            span id=(leaderboard_cell_id(row)) hx-swap-oob="true" { (row.since_last.text(metric)) }
        }
    }
}

pub fn recent(view: &RecentView, metric: Metric, features: Features) -> Markup {
    html! {
        div class="overflow-x-auto" {
            table class="min-w-full divide-y divide-gray-200" {
                thead class="bg-gray-50" {
                    tr {
                        th class=(TH) { "Pokemon" }
                        th class=(TH) { "Date" }
                        th class=(TH) { "Location" }
                        th class=(TH) {
                            (metric_header("recent-metric", "last10", metric, features))
                        }
                    }
                }
                tbody class="bg-white divide-y divide-gray-200" {
                    @for (index, row) in view.rows.iter().enumerate() {
                        tr data-pokemon=(row.name) {
                            td class=(TD) {
                                (gif(&row.gif, &row.name))
                                (pokemon_name(&row.name, features))
                            }
                            td class=(TD) { (wire_date::format(row.date)) }
                            td class=(TD) { (row.location) }
                            td class=(TD) {
                                span id=(recent_cell_id(index)) { (row.since_last.text(metric)) }
                            }
                        }
                    }
                    @if view.rows.is_empty() {
                        tr {
                            td class={(TD) " text-center text-gray-500"} colspan="4" { "No encounters logged yet." }
                        }
                    }
                }
            }
        }
    }
}

pub fn recent_metric(view: &RecentView, metric: Metric) -> Markup {
    html! {
        span id="recent-metric" hx-swap-oob="true" { (metric.header()) }
        @for index in 0..view.rows.len() {
            span id=(recent_cell_id(index)) hx-swap-oob="true" {
                (view.rows[index].since_last.text(metric))
            }
        }
    }
}

pub fn locations(shares: &[LocationShare]) -> Markup {
    html! {
        table class="min-w-full divide-y divide-gray-200" {
            thead class="bg-gray-50" {
                tr {
                    th class=(TH) { "Location" }
                    th class=(TH) { "Percentage" }
                }
            }
            tbody class="bg-white divide-y divide-gray-200" {
                @for share in shares {
                    tr {
                        td class=(TD) { (share.location) }
                        td class=(TD) { (format!("{:.2}%", share.percentage)) }
                    }
                }
            }
        }
    }
}

pub fn stat(text: &str) -> Markup {
    html! { (text) }
}

pub fn load_error() -> Markup {
    html! {
        span class="text-sm text-red-600" { "Error loading data" }
    }
}

/// Banner plus sound for the first shiny of a page. The sound waits for a
/// click when the browser blocks autoplay.
pub fn shiny_reveal(reveal: &ShinyReveal, volume: f32) -> Markup {
    let script = format!(
        r#"(function () {{
    var audio = document.getElementById("shiny-audio");
    if (!audio) return;
    audio.volume = {volume};
    audio.play().catch(function () {{
        document.addEventListener("click", function () {{ audio.play(); }}, {{ once: true }});
    }});
}})();"#
    );

    html! {
        div id="shiny-message" hx-swap-oob="true"
            class="px-4 py-3 text-center text-yellow-900 bg-yellow-100 border border-yellow-300 rounded-lg" {
            p class="font-bold" { "A shiny " (reveal.pokemon) " appeared!" }
            audio #shiny-audio src="/static/shiny.mp3" preload="auto" {}
            script { (PreEscaped(script)) }
        }
    }
}
