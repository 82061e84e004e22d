use crate::extract::FacilityType;

/// Facility terms tested as substrings of the lowercased context window.
/// **Order matters** – the first term found wins, so a window mentioning
/// both an airfield and a plant is an airport.
///
/// Terms are stems: "казарм" covers казарма, казарми, казармах …
pub const FACILITY_TERMS: &[(&str, FacilityType)] = &[
    // ── Airfields ──────────────────────────────────────────────────────
    ("аеродром", FacilityType::Airport),
    ("аэропорт", FacilityType::Airport), // RU spelling still shows up
    ("летовище", FacilityType::Airport),
    // ── Garrisons ──────────────────────────────────────────────────────
    ("казарм", FacilityType::MilitaryBase),
    // "база" sits between the two garrison terms, so "база в/ч" is a Base
    ("база", FacilityType::Base),
    ("в/ч", FacilityType::MilitaryBase), // військова частина
    // ── Logistics ──────────────────────────────────────────────────────
    ("депо", FacilityType::Depot),
    ("склад", FacilityType::Warehouse),
    // ── Industry / energy ──────────────────────────────────────────────
    ("завод", FacilityType::Factory),
    ("електростанц", FacilityType::PowerPlant),
    ("енерго", FacilityType::PowerPlant), // енергооб'єкт, енергетичн …
    // ── Air defence ────────────────────────────────────────────────────
    ("пво", FacilityType::AirDefense),
    ("зрк", FacilityType::AirDefense),
];

/// Lowercase substring key → canonical city name.
///
/// Keys are plain substrings, not words: the two-letter channel slang
/// ("дп", "зп", "од") also fires inside unrelated words.
pub const CITY_KEYWORDS: &[(&str, &str)] = &[
    ("київ", "Київ"),
    ("одес", "Одеса"),
    ("харків", "Харків"),
    ("львів", "Львів"),
    ("дніпр", "Дніпро"),
    ("запоріж", "Запоріжжя"),
    ("миколаїв", "Миколаїв"),
    ("херсон", "Херсон"),
    // slang
    ("дп", "Дніпро"),
    ("зп", "Запоріжжя"),
    ("од", "Одеса"),
];

/// Capitalised words that the proper-noun pattern picks up from channel
/// boilerplate and foreign-press citations but which are never places.
pub const SKIP_WORDS: &[&str] = &[
    "український",
    "ппошник",
    "канал",
    "підтримати",
    "напрямок",
    "решта",
    "the",
    "new",
    "times",
    "cnn",
    "оае",
    "сша",
];
