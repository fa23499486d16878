use dioxus::html::geometry::WheelDelta;
use dioxus::html::input_data::MouseButton;
use dioxus::prelude::*;
use pinmap_shared::geometry::{Size, ViewState};
use pinmap_shared::pins::PinPlacement;
use pinmap_shared::{FrameOutput, InputEvent, MapSession};

use crate::coords;

pub const MAP_CONTAINER_ID: &str = "pinmap-container";

// ---------------------------------------------------------------------------
// Style builders (pure functions, easily testable)
// ---------------------------------------------------------------------------

/// Transform for the map surface. The surface is laid out at base size with
/// its origin in the top-left corner.
fn surface_style(view: &ViewState, base: Size) -> String {
    format!(
        "width: {}px; height: {}px; transform: translate3d({}px, {}px, 0) scale({}); transform-origin: 0 0;",
        base.width, base.height, view.offset_x, view.offset_y, view.scale
    )
}

/// Pins sit in screen space, centered on their projected position.
fn pin_style(placement: &PinPlacement, icon_width: f64, icon_height: f64) -> String {
    format!(
        "width: {icon_width}px; height: {icon_height}px; transform: translate(-50%, -50%) translate({}px, {}px) scale({});",
        placement.screen_x, placement.screen_y, placement.scale
    )
}

/// Convert a wheel delta (pixels / lines / pages) to a uniform pixel-like value.
fn wheel_delta_y(delta: WheelDelta) -> f64 {
    match delta {
        WheelDelta::Pixels(d) => d.y,
        WheelDelta::Lines(d) => d.y * 40.0,
        WheelDelta::Pages(d) => d.y * 400.0,
    }
}

fn container_point(client_x: f64, client_y: f64) -> Option<(f64, f64)> {
    coords::point_in_element(client_x, client_y, MAP_CONTAINER_ID)
}

#[derive(Debug, Clone, PartialEq)]
pub struct PinItem {
    pub id: String,
    pub title: String,
    pub icon_url: String,
    pub style: String,
}

fn pin_items(session: &MapSession, placements: &[PinPlacement]) -> Vec<PinItem> {
    placements
        .iter()
        .filter_map(|p| {
            let pin = session.pins().get(&p.id)?;
            Some(PinItem {
                id: pin.id.clone(),
                title: pin.title.clone(),
                icon_url: pin.primary_icon_url.clone(),
                style: pin_style(p, pin.icon_size_x, pin.icon_size_y),
            })
        })
        .collect()
}

#[component]
fn PinMarker(item: PinItem, on_tap: EventHandler<String>) -> Element {
    let click_id = item.id.clone();
    let touch_id = item.id.clone();
    rsx! {
        button {
            class: "pin",
            style: "{item.style}",
            title: "{item.title}",
            "aria-label": "{item.title}",
            onclick: move |evt: Event<MouseData>| {
                evt.stop_propagation();
                on_tap.call(click_id.clone());
            },
            ontouchend: move |_| on_tap.call(touch_id.clone()),
            img { src: "{item.icon_url}", alt: "", draggable: "false" }
        }
    }
}

/// The interactive map: background surface, pin layer and all pointer input.
///
/// Reads the session without subscribing; re-renders are driven by `frame`.
#[component]
pub fn MapView(
    session: Signal<MapSession>,
    frame: Signal<Option<FrameOutput>>,
    background_url: Option<String>,
    dragging: bool,
    on_input: EventHandler<InputEvent>,
    on_pin_tap: EventHandler<String>,
) -> Element {
    let current = frame.read().clone();
    let (surface, pins) = {
        let s = session.peek();
        let config = s.config();
        let base = Size::new(config.base_width, config.base_height);
        let view = current.as_ref().map(|f| f.view).unwrap_or_else(|| s.view());
        let pins = current
            .as_ref()
            .map(|f| pin_items(&s, &f.pins))
            .unwrap_or_default();
        (surface_style(&view, base), pins)
    };
    let container_class = if dragging {
        "map-container dragging"
    } else {
        "map-container"
    };

    rsx! {
        div {
            id: MAP_CONTAINER_ID,
            class: "{container_class}",

            onresize: move |_evt: Event<ResizeData>| on_input.call(InputEvent::Resize),

            onwheel: move |evt: Event<WheelData>| {
                evt.prevent_default();
                let delta_y = wheel_delta_y(evt.data().delta());
                let client = evt.data().client_coordinates();
                if let Some((x, y)) = container_point(client.x, client.y) {
                    on_input.call(InputEvent::Wheel { delta_y, x, y });
                }
            },

            onmousedown: move |evt: Event<MouseData>| {
                let primary = evt.trigger_button() == Some(MouseButton::Primary);
                let client = evt.client_coordinates();
                if let Some((x, y)) = container_point(client.x, client.y) {
                    on_input.call(InputEvent::MouseDown { x, y, primary });
                }
            },

            onmousemove: move |evt: Event<MouseData>| {
                let client = evt.client_coordinates();
                if let Some((x, y)) = container_point(client.x, client.y) {
                    on_input.call(InputEvent::MouseMove { x, y });
                }
            },

            onmouseup: move |_| on_input.call(InputEvent::MouseUp),

            onmouseleave: move |_| on_input.call(InputEvent::MouseLeave),

            ondoubleclick: move |evt: Event<MouseData>| {
                evt.prevent_default();
                on_input.call(InputEvent::DoubleClick);
            },

            ontouchstart: move |evt: Event<TouchData>| {
                evt.prevent_default();
                let points = evt
                    .data()
                    .touches()
                    .iter()
                    .filter_map(|t| {
                        let c = t.client_coordinates();
                        container_point(c.x, c.y)
                    })
                    .collect();
                on_input.call(InputEvent::TouchStart(points));
            },

            ontouchmove: move |evt: Event<TouchData>| {
                evt.prevent_default();
                let points = evt
                    .data()
                    .touches()
                    .iter()
                    .filter_map(|t| {
                        let c = t.client_coordinates();
                        container_point(c.x, c.y)
                    })
                    .collect();
                on_input.call(InputEvent::TouchMove(points));
            },

            ontouchend: move |evt: Event<TouchData>| {
                evt.prevent_default();
                let remaining = evt
                    .data()
                    .touches()
                    .iter()
                    .filter_map(|t| {
                        let c = t.client_coordinates();
                        container_point(c.x, c.y)
                    })
                    .collect();
                on_input.call(InputEvent::TouchEnd(remaining));
            },

            ontouchcancel: move |_evt: Event<TouchData>| {
                on_input.call(InputEvent::TouchEnd(Vec::new()));
            },

            // Transformed surface; pins live outside it so they keep their size
            div {
                class: "map-surface",
                style: "{surface}",
                if let Some(url) = background_url {
                    img { src: "{url}", alt: "", draggable: "false" }
                }
            }

            div { class: "pin-layer",
                for item in pins {
                    PinMarker { key: "{item.id}", item: item.clone(), on_tap: on_pin_tap }
                }
            }
        }
    }
}
