use maud::{html, Markup};

use crate::model::stats::{wire_date, PokemonEntries};

pub fn m(name: &str, gif_url: &str, details: &PokemonEntries) -> Markup {
    html! {
        div class="fixed inset-0 z-50 flex items-center justify-center bg-black/50" {
            div class="w-full max-w-2xl p-6 bg-white rounded-lg shadow-xl" {
                div class="flex items-center justify-between mb-4" {
                    div class="flex items-center gap-3" {
                        img class="w-16 h-16" src=(gif_url) alt=(name);
                        h2 class="text-2xl font-bold" { (name) }
                    }
                    button type="button" class="text-2xl text-gray-500 hover:text-gray-900"
                        onclick="document.getElementById('modal').innerHTML = ''" { "×" }
                }

                p class="mb-4 text-gray-700" { "Total entries: " (details.total_entries) }

                @if !details.location_percentages.is_empty() {
                    h3 class="mb-2 font-semibold" { "Locations" }
                    ul class="mb-4 space-y-1" {
                        @for location in &details.location_percentages {
                            li class="text-sm" {
                                (location.location) ": " (location.count)
                                " (" (format!("{:.2}%", location.percentage)) ")"
                            }
                        }
                    }
                }

                h3 class="mb-2 font-semibold" { "Entries" }
                @if details.entries.is_empty() {
                    p class="text-sm text-gray-500" { "No entries yet." }
                } @else {
                    div class="overflow-y-auto max-h-64" {
                        table class="min-w-full text-sm" {
                            thead {
                                tr {
                                    th class="text-left" { "Date" }
                                    th class="text-left" { "Location" }
                                    th class="text-left" { "Notes" }
                                }
                            }
                            tbody {
                                @for entry in &details.entries {
                                    tr {
                                        td { (wire_date::format(entry.date)) }
                                        td { (entry.location) }
                                        td { (entry.notes) }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
