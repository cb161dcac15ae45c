/*
 * iOS platform: binds the capability seam to UIKit's UIScrollView. UIKit
 * reports geometry in points (already density-independent), so this handle
 * multiplies by the screen scale at the trait boundary, keeping the shared
 * adapter math in device pixels on every platform.
 *
 * Listener callbacks arrive through a UIScrollViewDelegate defined here;
 * the delegate holds only listener tokens, never the owning widget, so
 * UIKit-side retention cannot keep a disposed widget alive.
 *
 * Note the interaction-toggle asymmetry with Android: UIKit's
 * userInteractionEnabled is a single flag and disables interaction
 * recursively for all subviews.
 */

use crate::error::{PlatformError, Result as PlatformResult};
use crate::native_handle::{
    self, ListenerToken, NativeScrollClass, NativeScrollHandle,
};
use crate::units::MIN_DISPLAY_DENSITY;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use objc2::rc::Retained;
use objc2::runtime::ProtocolObject;
use objc2::{DefinedClass, MainThreadMarker, MainThreadOnly, define_class, msg_send};
use objc2_foundation::{CGPoint, NSObject, NSObjectProtocol};
use objc2_ui_kit::{UIScreen, UIScrollView, UIScrollViewDelegate};

struct DelegateIvars {
    change_token: Cell<Option<ListenerToken>>,
    observer_tokens: RefCell<Vec<ListenerToken>>,
    /// Screen scale, for converting delegate-reported points to device px.
    scale: Cell<f64>,
}

define_class!(
    #[unsafe(super(NSObject))]
    #[thread_kind = MainThreadOnly]
    #[name = "ScrollductScrollDelegate"]
    #[ivars = DelegateIvars]
    struct ScrollDelegate;

    unsafe impl NSObjectProtocol for ScrollDelegate {}

    unsafe impl UIScrollViewDelegate for ScrollDelegate {
        #[unsafe(method(scrollViewDidScroll:))]
        fn scroll_view_did_scroll(&self, scroll_view: &UIScrollView) {
            let scale = self.ivars().scale.get();
            let offset = scroll_view.contentOffset();
            let x = (offset.x * scale).round() as i32;
            let y = (offset.y * scale).round() as i32;
            if let Some(token) = self.ivars().change_token.get() {
                native_handle::dispatch_scroll_change(token, x, y);
            }
            for token in self.ivars().observer_tokens.borrow().iter().copied() {
                native_handle::dispatch_scroll_changed(token);
            }
        }
    }
);

impl ScrollDelegate {
    fn new(mtm: MainThreadMarker, scale: f64) -> Retained<Self> {
        let this = Self::alloc(mtm).set_ivars(DelegateIvars {
            change_token: Cell::new(None),
            observer_tokens: RefCell::new(Vec::new()),
            scale: Cell::new(scale),
        });
        unsafe { msg_send![super(this), init] }
    }
}

struct IosContextState {
    mtm: MainThreadMarker,
    scale: f64,
    next_view_tag: Cell<i32>,
}

/// iOS platform context. The screen scale is read once from the main screen
/// at construction and read-only afterwards.
#[derive(Clone)]
pub struct PlatformContext {
    state: Rc<IosContextState>,
}

impl PlatformContext {
    pub fn new(mtm: MainThreadMarker) -> PlatformResult<Self> {
        let scale = UIScreen::mainScreen(mtm).scale();
        if !scale.is_finite() || scale < MIN_DISPLAY_DENSITY {
            return Err(PlatformError::InitializationFailed(format!(
                "UIScreen reported unusable scale {scale}"
            )));
        }
        log::debug!("IosPlatform: context ready, scale {scale}");
        Ok(Self {
            state: Rc::new(IosContextState {
                mtm,
                scale,
                next_view_tag: Cell::new(1),
            }),
        })
    }

    pub fn display_density(&self) -> f64 {
        self.state.scale
    }

    pub(crate) fn generate_view_id(&self) -> i32 {
        let tag = self.state.next_view_tag.get();
        self.state.next_view_tag.set(tag + 1);
        tag
    }

    pub(crate) fn new_scroll_view(
        &self,
        class: NativeScrollClass,
    ) -> PlatformResult<Box<dyn NativeScrollHandle>> {
        let mtm = self.state.mtm;
        let scroll_view = unsafe { UIScrollView::new(mtm) };
        match class {
            NativeScrollClass::HorizontalScrollView => {
                scroll_view.setAlwaysBounceHorizontal(true);
                scroll_view.setShowsVerticalScrollIndicator(false);
            }
            NativeScrollClass::VerticalScrollView => {
                scroll_view.setAlwaysBounceVertical(true);
            }
        }
        let delegate = ScrollDelegate::new(mtm, self.state.scale);
        scroll_view.setDelegate(Some(ProtocolObject::from_ref(&*delegate)));
        log::debug!("IosPlatform: created UIScrollView for {class:?}");
        Ok(Box::new(IosScrollHandle {
            scroll_view,
            delegate,
            class,
            scale: self.state.scale,
            scroll_enabled: true,
        }))
    }
}

struct IosScrollHandle {
    scroll_view: Retained<UIScrollView>,
    delegate: Retained<ScrollDelegate>,
    class: NativeScrollClass,
    scale: f64,
    /// UIKit has no scrollEnabled getter distinct from the property; cache
    /// the last value written so reads stay cheap.
    scroll_enabled: bool,
}

impl IosScrollHandle {
    fn content_offset_px(&self) -> (i32, i32) {
        let offset = self.scroll_view.contentOffset();
        (
            (offset.x * self.scale).round() as i32,
            (offset.y * self.scale).round() as i32,
        )
    }

    fn set_offset_px(&self, x: i32, y: i32, animated: bool) {
        let point = CGPoint {
            x: f64::from(x) / self.scale,
            y: f64::from(y) / self.scale,
        };
        unsafe { self.scroll_view.setContentOffset_animated(point, animated) };
    }
}

impl NativeScrollHandle for IosScrollHandle {
    fn class(&self) -> NativeScrollClass {
        self.class
    }

    fn view_id(&self) -> i32 {
        self.scroll_view.tag() as i32
    }

    fn set_view_id(&mut self, id: i32) {
        self.scroll_view.setTag(id as isize);
    }

    fn scroll_x(&self) -> i32 {
        self.content_offset_px().0
    }

    fn scroll_y(&self) -> i32 {
        self.content_offset_px().1
    }

    fn scrollable_length(&self) -> i32 {
        let content = self.scroll_view.contentSize();
        let bounds = self.scroll_view.bounds().size;
        let points = match self.class {
            NativeScrollClass::HorizontalScrollView => content.width - bounds.width,
            NativeScrollClass::VerticalScrollView => content.height - bounds.height,
        };
        (points.max(0.0) * self.scale).round() as i32
    }

    fn scroll_to(&mut self, x: i32, y: i32) {
        self.set_offset_px(x, y, false);
    }

    fn smooth_scroll_to(&mut self, x: i32, y: i32) {
        self.set_offset_px(x, y, true);
    }

    fn scroll_enabled(&self) -> bool {
        self.scroll_enabled
    }

    fn set_scroll_enabled(&mut self, enabled: bool) {
        self.scroll_enabled = enabled;
        self.scroll_view.setScrollEnabled(enabled);
    }

    fn set_user_interaction_enabled(&mut self, enabled: bool) {
        // Single recursive flag on this platform; nothing else to couple.
        self.scroll_view.setUserInteractionEnabled(enabled);
    }

    fn set_horizontal_scroll_bar_enabled(&mut self, enabled: bool) {
        self.scroll_view.setShowsHorizontalScrollIndicator(enabled);
    }

    fn set_vertical_scroll_bar_enabled(&mut self, enabled: bool) {
        self.scroll_view.setShowsVerticalScrollIndicator(enabled);
    }

    fn set_scroll_change_listener(&mut self, token: Option<ListenerToken>) {
        self.delegate.ivars().change_token.set(token);
    }

    fn add_scroll_observer(&mut self, token: ListenerToken) {
        self.delegate.ivars().observer_tokens.borrow_mut().push(token);
    }

    fn remove_scroll_observer(&mut self, token: ListenerToken) {
        self.delegate
            .ivars()
            .observer_tokens
            .borrow_mut()
            .retain(|t| *t != token);
    }
}
