use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;
use pinmap_shared::controller::{Gesture, KeyCommand, PanDirection};
use pinmap_shared::gallery::{GalleryView, OpenDetail};
use pinmap_shared::geometry::Size;
use pinmap_shared::models::MapData;
use pinmap_shared::{FrameOutput, InputEvent, LoadState, MapSession};

use crate::api;
use crate::components::controls_panel::{ControlsPanel, SliderRanges};
use crate::components::detail_modal::DetailModal;
use crate::components::map_view::{MapView, MAP_CONTAINER_ID};
use crate::coords;

/// Matches the fade-out duration in main.css.
const MODAL_CLOSE_MS: u32 = 300;

/// Run frames until the session stops asking for them.
///
/// Only called when the session reports an idle-to-pending transition, so at
/// most one loop is alive at a time.
fn run_frames(mut session: Signal<MapSession>, mut frame: Signal<Option<FrameOutput>>) {
    spawn(async move {
        loop {
            let next = coords::next_animation_frame().await;
            let viewport = coords::element_size(MAP_CONTAINER_ID)
                .unwrap_or_else(|| session.peek().controller().viewport());
            let Some(now) = next else {
                // Draw once anyway so the pending frame is consumed and later
                // input can start a new loop.
                tracing::warn!("no animation frame available, rendering once");
                let output = session.write().render_frame(viewport, coords::now_ms());
                frame.set(Some(output));
                break;
            };
            let output = session.write().render_frame(viewport, now);
            let again = output.needs_next_frame;
            frame.set(Some(output));
            if !again {
                break;
            }
        }
    });
}

#[component]
pub fn MapPage() -> Element {
    let resource = use_resource(api::fetch_map_data);

    let state: LoadState<MapData> = match &*resource.read() {
        None => LoadState::Loading,
        Some(result) => LoadState::from(result.clone()),
    };

    if let LoadState::Failed(e) = &state {
        tracing::error!(error = %e, "map data unavailable");
    }

    match state {
        LoadState::Ready(data) => rsx! {
            MapScreen { data }
        },
        other => rsx! {
            div { class: "app",
                DisabledControls {}
                div { class: "map-placeholder",
                    if let Some(message) = other.error_message() {
                        p { class: "load-error", role: "alert", "{message}" }
                    } else {
                        p { class: "loading", "Loading map\u{2026}" }
                    }
                }
            }
        },
    }
}

#[component]
fn DisabledControls() -> Element {
    rsx! {
        ControlsPanel {
            enabled: false,
            ranges: SliderRanges::default(),
            zoom_slider: 1.0,
            zoom_percent: 100,
            pin_scale: 1.0,
            pins_visible: true,
            map_views: Vec::new(),
            active_view: None,
            on_zoom: |_| {},
            on_pin_scale: |_| {},
            on_toggle_pins: |_| {},
            on_select_view: |_| {},
            on_pan: |_| {},
            on_reset: |_| {},
        }
    }
}

#[component]
fn MapScreen(data: MapData) -> Element {
    let mut session = use_signal(|| MapSession::new(data.clone(), Size::default()));
    let frame = use_signal(|| None::<FrameOutput>);
    let mut detail = use_signal(|| None::<OpenDetail>);
    let mut gallery = use_signal(|| None::<GalleryView>);
    let mut closing = use_signal(|| false);
    let mut active_view = use_signal(|| session.peek().active_view_index());

    // Preload every detail image once, then draw the first frame.
    use_hook(move || {
        coords::preload_images(data.detail_image_urls());
        if session.write().request_render() {
            run_frames(session, frame);
        }
    });

    let mut dispatch = move |input: InputEvent| {
        let needs_frame = session.write().handle(input, coords::now_ms());
        if needs_frame {
            run_frames(session, frame);
        }
    };

    let mut begin_close = move || {
        session.write().close_detail();
        if detail.peek().is_none() || *closing.peek() {
            return;
        }
        closing.set(true);
        spawn(async move {
            TimeoutFuture::new(MODAL_CLOSE_MS).await;
            // A pin opened during the fade keeps the modal.
            if session.peek().detail().is_none() {
                detail.set(None);
                gallery.set(None);
            }
            closing.set(false);
        });
    };

    let mut show_pin = move |id: String| {
        let view = session.write().select_pin(&id);
        if let Some(view) = view {
            detail.set(session.peek().detail().cloned());
            gallery.set(Some(view));
            closing.set(false);
        }
    };

    let current = frame.read().clone();
    let (ranges, pins_visible, map_views, dragging) = {
        let s = session.peek();
        (
            SliderRanges::from(s.config()),
            s.pins().visible(),
            s.map_views().to_vec(),
            matches!(s.controller().gesture(), Gesture::Panning { .. }) && s.controller().suppresses_tap(),
        )
    };
    let (zoom_slider, zoom_percent, pin_scale) = match &current {
        Some(f) => (f.zoom_slider, f.zoom_percent, f.pin_scale),
        None => {
            let s = session.peek();
            (
                s.controller().slider_value(s.config()),
                (s.view().scale * 100.0).round() as u32,
                s.pins().scale(),
            )
        }
    };
    let background_url = active_view
        .read()
        .and_then(|i| map_views.get(i))
        .map(|v| v.url.clone());

    rsx! {
        div {
            class: "app",
            tabindex: "0",
            // Keyboard pan and zoom work without clicking the page first.
            onmounted: move |evt: MountedEvent| async move {
                if let Err(e) = evt.set_focus(true).await {
                    tracing::debug!(error = ?e, "could not focus the app root");
                }
            },
            onkeydown: move |evt: Event<KeyboardData>| {
                let key = evt.key().to_string();
                let text_input_focused = coords::text_input_focused();
                let Some(cmd) = KeyCommand::from_key(&key) else {
                    return;
                };
                if !text_input_focused {
                    evt.prevent_default();
                }
                if cmd == KeyCommand::CloseDetail {
                    begin_close();
                    return;
                }
                dispatch(InputEvent::Key { key, text_input_focused });
            },

            ControlsPanel {
                enabled: true,
                ranges,
                zoom_slider,
                zoom_percent,
                pin_scale,
                pins_visible,
                map_views: map_views.clone(),
                active_view: *active_view.read(),
                on_zoom: move |v: f64| dispatch(InputEvent::ZoomSlider(v)),
                on_pin_scale: move |v: f64| dispatch(InputEvent::PinScaleSlider(v)),
                on_toggle_pins: move |visible: bool| {
                    if session.write().set_pins_visible(visible) {
                        run_frames(session, frame);
                    }
                },
                on_select_view: move |i: usize| {
                    if session.write().select_map_view(i).is_some() {
                        active_view.set(Some(i));
                    }
                },
                on_pan: move |dir: PanDirection| dispatch(InputEvent::Pan(dir)),
                on_reset: move |_| dispatch(InputEvent::ResetView),
            }

            MapView {
                session,
                frame,
                background_url,
                dragging,
                on_input: move |input: InputEvent| dispatch(input),
                on_pin_tap: move |id: String| show_pin(id),
            }

            DetailModal {
                detail: detail.read().clone(),
                gallery: gallery.read().clone(),
                closing: *closing.read(),
                on_close: move |_| begin_close(),
                on_cycle: move |dir: i64| {
                    let view = session.write().cycle_image(dir);
                    if view.is_some() {
                        gallery.set(view);
                    }
                },
                on_jump: move |i: usize| {
                    let view = session.write().jump_to_image(i);
                    if view.is_some() {
                        gallery.set(view);
                    }
                },
            }
        }
    }
}
