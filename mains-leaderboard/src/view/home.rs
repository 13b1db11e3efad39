use chrono::NaiveDate;
use maud::{html, Markup, PreEscaped};

use crate::{controllers::widgets::StatKind, dashboard::PageId};

const RESET_ON_SAVE: &str = r#"document.body.addEventListener("entry-added", function () {
    var form = document.getElementById("entryForm");
    var date = form.elements["date"].value;
    form.reset();
    form.elements["date"].value = date;
});"#;

const REFRESH: &str = "load, entry-added from:body";

fn card(title: &str, content: Markup) -> Markup {
    html! {
        div class="overflow-hidden bg-white border border-gray-200 rounded-lg shadow-sm" {
            div class="px-6 py-4 border-b border-gray-100" {
                h2 class="text-lg font-semibold text-gray-900" { (title) }
            }
            div class="p-4" { (content) }
        }
    }
}

fn widget(id: &str, url: &str) -> Markup {
    html! {
        div id=(id) hx-get=(url) hx-trigger=(REFRESH) hx-sync="this:replace" hx-swap="innerHTML" {
            p class="text-sm text-gray-500" { "Loading..." }
        }
    }
}

fn stat(kind: StatKind) -> Markup {
    html! {
        div class="p-3 text-center bg-white border border-gray-200 rounded-lg shadow-sm" {
            p class="text-xs font-medium tracking-wider text-gray-500 uppercase" { (kind.label()) }
            p class="mt-1 text-lg font-bold text-gray-900"
                hx-get={"/widgets/stat/"(kind.slug())}
                hx-trigger=(REFRESH)
                hx-sync="this:replace" {
                "…"
            }
        }
    }
}

fn entry_form<'a>(species: impl Iterator<Item = &'a str>, today: NaiveDate) -> Markup {
    let input = "w-full px-3 py-2 leading-tight text-gray-700 border rounded shadow appearance-none focus:outline-none focus:shadow-outline";

    html! {
        form #entryForm hx-post="/entry" hx-target="#message" hx-swap="outerHTML" {
            div class="grid gap-3 md:grid-cols-2" {
                div {
                    label class="block mb-1 text-sm font-bold text-gray-700" for="pokemon" { "Pokemon" }
                    input #pokemon class=(input) name="pokemon" type="text" list="pokemon-list" autocomplete="off" placeholder="Pokemon";
                    datalist #pokemon-list {
                        @for name in species {
                            option value=(name) {}
                        }
                    }
                }
                div {
                    label class="block mb-1 text-sm font-bold text-gray-700" for="location" { "Location" }
                    input #location class=(input) name="location" type="text" placeholder="Location";
                }
                div {
                    label class="block mb-1 text-sm font-bold text-gray-700" for="date" { "Date" }
                    input #date class=(input) name="date" type="date" value=(today.format("%Y-%m-%d").to_string());
                }
                div {
                    label class="block mb-1 text-sm font-bold text-gray-700" for="notes" { "Notes" }
                    input #notes class=(input) name="notes" type="text" placeholder="Optional";
                }
            }
            button type="submit" class="px-4 py-2 mt-3 font-bold text-white bg-green-500 rounded hover:bg-green-700 focus:outline-none focus:shadow-outline" {
                "Add Entry"
            }
        }
        p #message {}
        script { (PreEscaped(RESET_ON_SAVE)) }
    }
}

pub fn m<'a>(
    title: &str,
    page_id: &PageId,
    species: impl Iterator<Item = &'a str>,
    today: NaiveDate,
) -> Markup {
    super::base(
        title,
        Some(page_id),
        html! {
            main class="max-w-6xl px-4 py-6 mx-auto space-y-6" {
                h1 class="text-4xl font-extrabold text-center" { (title) }
                div #shiny-message {}

                (card("Log an Encounter", entry_form(species, today)))

                div class="grid grid-cols-2 gap-3 md:grid-cols-4 lg:grid-cols-7" {
                    @for kind in StatKind::ALL {
                        (stat(kind))
                    }
                }

                (card("Leaderboard", widget("leaderboard", "/widgets/leaderboard")))

                div class="grid gap-6 md:grid-cols-2" {
                    (card("Last 10", widget("last10", "/widgets/last10")))
                    (card("Locations", widget("locations", "/widgets/locations")))
                }
            }
            div #modal {}
        },
    )
}
