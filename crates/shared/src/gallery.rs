use crate::models::Pin;

/// What the detail overlay should show for the gallery right now.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryView {
    pub url: String,
    pub index: usize,
    pub total: usize,
}

impl GalleryView {
    /// Prev/next buttons and indicator dots only make sense with more than one image.
    pub fn has_navigation(&self) -> bool {
        self.total > 1
    }
}

/// Ordered images of the open pin plus the current position.
///
/// Navigation wraps around at both ends.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GalleryState {
    images: Vec<String>,
    current_index: usize,
}

impl GalleryState {
    pub fn for_pin(pin: &Pin) -> Self {
        Self {
            images: pin.gallery_images(),
            current_index: 0,
        }
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_image(&self) -> Option<&str> {
        self.images.get(self.current_index).map(String::as_str)
    }

    /// Step by `direction` (negative = previous), wrapping at the ends.
    pub fn cycle(&mut self, direction: i64) {
        let len = self.images.len();
        if len == 0 {
            return;
        }
        let len = len as i64;
        let next = (self.current_index as i64 + direction).rem_euclid(len);
        self.current_index = next as usize;
    }

    /// Jump straight to `index`. Out-of-range indices are ignored.
    pub fn jump_to(&mut self, index: usize) {
        if index < self.images.len() {
            self.current_index = index;
        }
    }

    pub fn view(&self) -> Option<GalleryView> {
        self.current_image().map(|url| GalleryView {
            url: url.to_string(),
            index: self.current_index,
            total: self.images.len(),
        })
    }
}

/// The pin whose detail popup is open.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenDetail {
    pub pin_id: String,
    pub title: String,
    pub description: String,
    pub additional_icons: Vec<String>,
    pub gallery: GalleryState,
}

/// Detail popup selection, independent of the viewport.
#[derive(Debug, Clone, Default)]
pub struct DetailOverlay {
    open: Option<OpenDetail>,
}

impl DetailOverlay {
    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn current(&self) -> Option<&OpenDetail> {
        self.open.as_ref()
    }

    /// Open `pin`, replacing whatever was open before.
    pub fn open(&mut self, pin: &Pin) -> &OpenDetail {
        tracing::debug!(pin = %pin.id, "opening pin detail");
        self.open.insert(OpenDetail {
            pin_id: pin.id.clone(),
            title: pin.title.clone(),
            description: pin.description.clone(),
            additional_icons: pin
                .additional_icons
                .iter()
                .filter(|url| !url.trim().is_empty())
                .cloned()
                .collect(),
            gallery: GalleryState::for_pin(pin),
        })
    }

    pub fn close(&mut self) -> bool {
        self.open.take().is_some()
    }

    pub fn cycle(&mut self, direction: i64) -> Option<GalleryView> {
        let detail = self.open.as_mut()?;
        detail.gallery.cycle(direction);
        detail.gallery.view()
    }

    pub fn jump_to(&mut self, index: usize) -> Option<GalleryView> {
        let detail = self.open.as_mut()?;
        detail.gallery.jump_to(index);
        detail.gallery.view()
    }

    pub fn gallery_view(&self) -> Option<GalleryView> {
        self.open.as_ref().and_then(|d| d.gallery.view())
    }
}
