//! Interactive type-ahead demo.
//!
//! Binds the dashboard's Year, Sector and Location filters and drives them
//! from stdin:
//!
//! ```text
//! type sector ba       # input change
//! key sector down      # up | down | enter | esc
//! click sector 0       # click a row
//! outside              # click on the page background
//! show                 # print every field
//! quit
//! ```
//!
//! Run with `cargo run -p insight --example typeahead`. Pass a TOML config
//! path to query a running dashboard server instead of the built-in lists;
//! `RUST_LOG=insight=debug` shows the lookup traffic.

use std::io::BufRead;
use std::sync::Arc;

use insight::{
    BindOptions, Document, FieldBinder, FieldBinding, FieldTag, NavigationKey, PointerEvent,
    StringListSource, SuggestConfig, SuggestionSource,
};
use tracing_subscriber::EnvFilter;

fn builtin_lists() -> StringListSource {
    StringListSource::new()
        .with_items(FieldTag::Year, ["2019", "2020", "2021", "2022", "2023", "2024"])
        .with_items(
            FieldTag::Sector,
            ["Banking", "Bakery", "Biotech", "Education", "Energy", "Healthcare", "IT Services"],
        )
        .with_items(
            FieldTag::Location,
            ["Delhi", "Karnataka", "Kerala", "Maharashtra", "Tamil Nadu", "Telangana"],
        )
}

fn print_field(binding: &FieldBinding) {
    let state = binding.dropdown_state();
    println!("{:<28} value={:?}", binding.field().to_string(), binding.value());
    for (i, item) in state.items().iter().enumerate() {
        let marker = if state.highlighted() == Some(i) { '>' } else { ' ' };
        println!("   {marker} [{i}] {item}");
    }
}

fn find<'a>(fields: &'a [FieldBinding], name: &str) -> Option<&'a FieldBinding> {
    let tag = match name.parse::<FieldTag>() {
        Ok(tag) => tag,
        Err(_) if name == "state" => FieldTag::Location,
        Err(_) => return None,
    };
    fields.iter().find(|b| b.field().tag == tag)
}

fn parse_key(name: &str) -> Option<NavigationKey> {
    match name {
        "up" => Some(NavigationKey::Up),
        "down" => Some(NavigationKey::Down),
        "enter" => Some(NavigationKey::Enter),
        "esc" | "escape" => Some(NavigationKey::Escape),
        _ => None,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let (config, source): (SuggestConfig, Arc<dyn SuggestionSource>) =
        match std::env::args().nth(1) {
            Some(path) => {
                let config = SuggestConfig::load(path)?;
                let source: Arc<dyn SuggestionSource> = Arc::new(config.http_source()?);
                (config, source)
            }
            None => {
                let source: Arc<dyn SuggestionSource> = Arc::new(builtin_lists());
                (SuggestConfig::default(), source)
            }
        };

    let document = Document::new();
    document.add_input("yearInput")?;
    document.add_input("sectorInput")?;
    document.add_input("stateInput")?;
    document.add_container("yearSuggest")?;

    let binder = FieldBinder::new(document, source).with_settings(config.controller_settings());
    let fields = [
        binder.bind("yearInput", FieldTag::Year, BindOptions::existing_box("yearSuggest"))?,
        binder.bind("sectorInput", FieldTag::Sector, BindOptions::auto_create())?,
        binder.bind("stateInput", FieldTag::Location, BindOptions::auto_create())?,
    ];

    for binding in &fields {
        let name = binding.field().to_string();
        binding
            .signals()
            .activated()
            .connect(move |text| println!("{name}: committed {text:?}"));
    }

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let mut words = line.splitn(3, ' ');
        match (words.next(), words.next(), words.next()) {
            (Some("type"), Some(field), text) => match find(&fields, field) {
                Some(binding) => {
                    if let Some(lookup) = binding.input_changed(text.unwrap_or("")) {
                        let outcome = lookup.settled().await;
                        println!("lookup: {outcome:?}");
                    }
                    print_field(binding);
                }
                None => println!("unknown field {field:?}"),
            },
            (Some("key"), Some(field), Some(key)) => match (find(&fields, field), parse_key(key)) {
                (Some(binding), Some(key)) => {
                    if !binding.key_pressed(key) {
                        println!("(not handled)");
                    }
                    print_field(binding);
                }
                _ => println!("usage: key <field> up|down|enter|esc"),
            },
            (Some("click"), Some(field), Some(index)) => {
                match (find(&fields, field), index.trim().parse::<usize>()) {
                    (Some(binding), Ok(index)) => {
                        binder
                            .coordinator()
                            .pointer_pressed(&PointerEvent::on_row(binding.box_id(), index));
                        if binding.click_row(index).is_none() {
                            println!("no row {index}");
                        }
                    }
                    _ => println!("usage: click <field> <row>"),
                }
            }
            (Some("outside"), None, None) => {
                let closed = binder.coordinator().pointer_pressed(&PointerEvent::nowhere());
                println!("closed {closed} dropdown(s)");
            }
            (Some("show"), None, None) => fields.iter().for_each(print_field),
            (Some("quit"), None, None) => break,
            (None, ..) | (Some(""), ..) => {}
            _ => println!("commands: type | key | click | outside | show | quit"),
        }
    }

    Ok(())
}
