use dioxus::prelude::*;
use pinmap_shared::gallery::{GalleryView, OpenDetail};

/// Pin detail popup with its image gallery.
///
/// `closing` keeps the modal mounted while the fade-out runs.
#[component]
pub fn DetailModal(
    detail: Option<OpenDetail>,
    gallery: Option<GalleryView>,
    closing: bool,
    on_close: EventHandler<()>,
    on_cycle: EventHandler<i64>,
    on_jump: EventHandler<usize>,
) -> Element {
    let Some(detail) = detail else {
        return rsx! {};
    };
    let backdrop_class = if closing {
        "detail-backdrop closing"
    } else {
        "detail-backdrop open"
    };

    rsx! {
        div {
            class: "{backdrop_class}",
            onclick: move |_| on_close.call(()),

            div {
                class: "detail-modal",
                role: "dialog",
                "aria-modal": "true",
                "aria-label": "{detail.title}",
                onclick: move |evt: Event<MouseData>| evt.stop_propagation(),

                button {
                    class: "close-detail",
                    "aria-label": "Close",
                    onclick: move |_| on_close.call(()),
                    "\u{00d7}"
                }

                h2 { "{detail.title}" }
                if !detail.description.is_empty() {
                    p { class: "detail-description", "{detail.description}" }
                }

                if let Some(view) = gallery {
                    div { class: "gallery",
                        if view.has_navigation() {
                            button {
                                class: "gallery-prev",
                                "aria-label": "Previous image",
                                onclick: move |_| on_cycle.call(-1),
                                "\u{2039}"
                            }
                        }
                        img {
                            class: "gallery-image",
                            src: "{view.url}",
                            alt: "{detail.title}",
                        }
                        if view.has_navigation() {
                            button {
                                class: "gallery-next",
                                "aria-label": "Next image",
                                onclick: move |_| on_cycle.call(1),
                                "\u{203a}"
                            }
                        }
                    }
                    if view.has_navigation() {
                        div { class: "gallery-dots",
                            for i in 0..view.total {
                                button {
                                    key: "{i}",
                                    class: if i == view.index { "dot active" } else { "dot" },
                                    "aria-label": "Image {i + 1} of {view.total}",
                                    onclick: move |_| on_jump.call(i),
                                }
                            }
                        }
                    }
                }

                if !detail.additional_icons.is_empty() {
                    div { class: "additional-icons",
                        for url in detail.additional_icons.iter() {
                            img { key: "{url}", src: "{url}", alt: "" }
                        }
                    }
                }
            }
        }
    }
}
