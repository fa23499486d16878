use dioxus::prelude::*;
use pinmap_shared::controller::PanDirection;
use pinmap_shared::models::{MapConfig, MapView};

/// Slider bounds taken from the map configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SliderRanges {
    pub zoom_min: f64,
    pub zoom_max: f64,
    pub zoom_step: f64,
    pub pin_min: f64,
    pub pin_max: f64,
    pub pin_step: f64,
}

impl From<&MapConfig> for SliderRanges {
    fn from(c: &MapConfig) -> Self {
        SliderRanges {
            zoom_min: c.min_zoom,
            zoom_max: c.max_zoom,
            zoom_step: c.zoom_step,
            pin_min: c.pin_min_scale,
            pin_max: c.pin_max_scale,
            pin_step: c.pin_scale_step,
        }
    }
}

impl Default for SliderRanges {
    fn default() -> Self {
        SliderRanges {
            zoom_min: 1.0,
            zoom_max: 1.0,
            zoom_step: 0.05,
            pin_min: 1.0,
            pin_max: 1.0,
            pin_step: 0.1,
        }
    }
}

const PAN_BUTTONS: [(PanDirection, &str, &str); 4] = [
    (PanDirection::Up, "\u{2191}", "Pan up"),
    (PanDirection::Left, "\u{2190}", "Pan left"),
    (PanDirection::Right, "\u{2192}", "Pan right"),
    (PanDirection::Down, "\u{2193}", "Pan down"),
];

#[component]
pub fn ControlsPanel(
    enabled: bool,
    ranges: SliderRanges,
    zoom_slider: f64,
    zoom_percent: u32,
    pin_scale: f64,
    pins_visible: bool,
    map_views: Vec<MapView>,
    active_view: Option<usize>,
    on_zoom: EventHandler<f64>,
    on_pin_scale: EventHandler<f64>,
    on_toggle_pins: EventHandler<bool>,
    on_select_view: EventHandler<usize>,
    on_pan: EventHandler<PanDirection>,
    on_reset: EventHandler<()>,
) -> Element {
    let disabled = !enabled;

    rsx! {
        div { class: "sidebar",
            div { class: "panel",
                h3 { "Zoom" }
                div { class: "slider-row",
                    input {
                        r#type: "range",
                        "aria-label": "Zoom",
                        min: "{ranges.zoom_min}",
                        max: "{ranges.zoom_max}",
                        step: "{ranges.zoom_step}",
                        value: "{zoom_slider}",
                        disabled,
                        oninput: move |evt: Event<FormData>| {
                            if let Ok(v) = evt.value().parse::<f64>() {
                                on_zoom.call(v);
                            }
                        },
                    }
                    span { class: "value", "{zoom_percent}%" }
                }
                div { class: "pan-grid",
                    for (dir, glyph, label) in PAN_BUTTONS {
                        button {
                            "aria-label": label,
                            disabled,
                            onclick: move |_| on_pan.call(dir),
                            "{glyph}"
                        }
                    }
                    button {
                        class: "reset",
                        disabled,
                        onclick: move |_| on_reset.call(()),
                        "Reset"
                    }
                }
            }

            div { class: "panel",
                h3 { "Pins" }
                label { class: "toggle-row",
                    input {
                        r#type: "checkbox",
                        checked: pins_visible,
                        disabled,
                        onchange: move |evt: Event<FormData>| on_toggle_pins.call(evt.checked()),
                    }
                    "Show pins"
                }
                div { class: "slider-row",
                    input {
                        r#type: "range",
                        "aria-label": "Pin size",
                        min: "{ranges.pin_min}",
                        max: "{ranges.pin_max}",
                        step: "{ranges.pin_step}",
                        value: "{pin_scale}",
                        disabled,
                        oninput: move |evt: Event<FormData>| {
                            if let Ok(v) = evt.value().parse::<f64>() {
                                on_pin_scale.call(v);
                            }
                        },
                    }
                    span { class: "value", "{pin_scale:.1}x" }
                }
            }

            if !map_views.is_empty() || disabled {
                div { class: "panel",
                    h3 { "Map" }
                    div { class: "view-buttons",
                        for (i, view) in map_views.iter().enumerate() {
                            button {
                                key: "{view.name}",
                                class: if active_view == Some(i) { "active" } else { "" },
                                disabled,
                                onclick: move |_| on_select_view.call(i),
                                "{view.name}"
                            }
                        }
                    }
                }
            }
        }
    }
}
