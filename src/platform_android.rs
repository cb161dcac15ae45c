/*
 * Android platform: binds the capability seam to the crate's companion
 * widget package (org.scrollduct.widgets) over JNI. The Java side carries
 * two scroll widget classes (HorizontalScrollView, VerticalScrollView
 * wrapping NestedScrollView) plus a static ScrollBridge used for listener
 * registration; ScrollBridge relays callbacks into the `nativeOnScroll*`
 * exports at the bottom of this file, which resolve the token through the
 * weak registry.
 *
 * All JNI calls run on the UI thread; the context attaches the current
 * thread lazily per call rather than caching a JNIEnv.
 */

use crate::error::{PlatformError, Result as PlatformResult};
use crate::native_handle::{
    self, ListenerToken, NativeScrollClass, NativeScrollHandle,
};
use crate::units::MIN_DISPLAY_DENSITY;

use std::rc::Rc;

use jni::JavaVM;
use jni::objects::{GlobalRef, JClass, JValue};
use jni::sys::{jint, jlong};

const HORIZONTAL_SCROLL_VIEW_CLASS: &str = "org/scrollduct/widgets/HorizontalScrollView";
const VERTICAL_SCROLL_VIEW_CLASS: &str = "org/scrollduct/widgets/VerticalScrollView";
const SCROLL_BRIDGE_CLASS: &str = "org/scrollduct/widgets/ScrollBridge";

struct AndroidContextState {
    vm: JavaVM,
    /// android.content.Context of the hosting activity.
    app_context: GlobalRef,
    density: f64,
}

/// Android platform context. Cheap to clone; all clones share the VM and
/// the activity context. Density is read from DisplayMetrics once at
/// construction and read-only afterwards.
#[derive(Clone)]
pub struct PlatformContext {
    state: Rc<AndroidContextState>,
}

impl PlatformContext {
    /// Builds a context from the hosting activity's Android context. Fails
    /// when the display metrics cannot be resolved — a fatal precondition
    /// for any native view creation.
    pub fn from_android_context(vm: JavaVM, app_context: GlobalRef) -> PlatformResult<Self> {
        let density = read_display_density(&vm, &app_context)?;
        if !density.is_finite() || density < MIN_DISPLAY_DENSITY {
            return Err(PlatformError::InitializationFailed(format!(
                "DisplayMetrics reported unusable density {density}"
            )));
        }
        log::debug!("AndroidPlatform: context ready, density {density}");
        Ok(Self {
            state: Rc::new(AndroidContextState {
                vm,
                app_context,
                density,
            }),
        })
    }

    pub fn display_density(&self) -> f64 {
        self.state.density
    }

    pub(crate) fn generate_view_id(&self) -> i32 {
        let result: PlatformResult<i32> = (|| {
            let mut env = self.state.vm.attach_current_thread()?;
            let id = env
                .call_static_method("android/view/View", "generateViewId", "()I", &[])?
                .i()?;
            Ok(id)
        })();
        match result {
            Ok(id) => id,
            Err(err) => {
                log::error!("AndroidPlatform: generateViewId failed: {err}");
                -1
            }
        }
    }

    pub(crate) fn new_scroll_view(
        &self,
        class: NativeScrollClass,
    ) -> PlatformResult<Box<dyn NativeScrollHandle>> {
        let class_name = match class {
            NativeScrollClass::HorizontalScrollView => HORIZONTAL_SCROLL_VIEW_CLASS,
            NativeScrollClass::VerticalScrollView => VERTICAL_SCROLL_VIEW_CLASS,
        };
        let mut env = self.state.vm.attach_current_thread()?;
        let view = env.new_object(
            class_name,
            "(Landroid/content/Context;)V",
            &[JValue::Object(self.state.app_context.as_obj())],
        )?;
        let view = env.new_global_ref(view)?;
        log::debug!("AndroidPlatform: created {class_name}");
        Ok(Box::new(AndroidScrollHandle {
            ctx: Rc::clone(&self.state),
            view,
            class,
        }))
    }
}

fn read_display_density(vm: &JavaVM, app_context: &GlobalRef) -> PlatformResult<f64> {
    let mut env = vm.attach_current_thread()?;
    let resources = env
        .call_method(
            app_context.as_obj(),
            "getResources",
            "()Landroid/content/res/Resources;",
            &[],
        )?
        .l()?;
    let metrics = env
        .call_method(
            &resources,
            "getDisplayMetrics",
            "()Landroid/util/DisplayMetrics;",
            &[],
        )?
        .l()?;
    let density = env.get_field(&metrics, "density", "F")?.f()?;
    Ok(f64::from(density))
}

struct AndroidScrollHandle {
    ctx: Rc<AndroidContextState>,
    view: GlobalRef,
    class: NativeScrollClass,
}

impl AndroidScrollHandle {
    fn call_int_getter(&self, name: &str) -> i32 {
        let result: PlatformResult<i32> = (|| {
            let mut env = self.ctx.vm.attach_current_thread()?;
            Ok(env.call_method(self.view.as_obj(), name, "()I", &[])?.i()?)
        })();
        match result {
            Ok(value) => value,
            Err(err) => {
                log::warn!("AndroidPlatform: {name} failed: {err}");
                0
            }
        }
    }

    fn call_bool_setter(&self, name: &str, value: bool) {
        let result: PlatformResult<()> = (|| {
            let mut env = self.ctx.vm.attach_current_thread()?;
            env.call_method(self.view.as_obj(), name, "(Z)V", &[JValue::Bool(value.into())])?;
            Ok(())
        })();
        if let Err(err) = result {
            log::warn!("AndroidPlatform: {name}({value}) failed: {err}");
        }
    }

    fn call_scroll(&self, name: &str, x: i32, y: i32) {
        let result: PlatformResult<()> = (|| {
            let mut env = self.ctx.vm.attach_current_thread()?;
            env.call_method(
                self.view.as_obj(),
                name,
                "(II)V",
                &[JValue::Int(x), JValue::Int(y)],
            )?;
            Ok(())
        })();
        if let Err(err) = result {
            log::warn!("AndroidPlatform: {name}({x}, {y}) failed: {err}");
        }
    }

    fn call_bridge(&self, name: &str, token: Option<ListenerToken>) {
        let raw = token.map_or(0, |t| t.raw() as jlong);
        let result: PlatformResult<()> = (|| {
            let mut env = self.ctx.vm.attach_current_thread()?;
            env.call_static_method(
                SCROLL_BRIDGE_CLASS,
                name,
                "(Landroid/view/View;J)V",
                &[JValue::Object(self.view.as_obj()), JValue::Long(raw)],
            )?;
            Ok(())
        })();
        if let Err(err) = result {
            log::warn!("AndroidPlatform: ScrollBridge.{name} failed: {err}");
        }
    }
}

impl NativeScrollHandle for AndroidScrollHandle {
    fn class(&self) -> NativeScrollClass {
        self.class
    }

    fn view_id(&self) -> i32 {
        self.call_int_getter("getId")
    }

    fn set_view_id(&mut self, id: i32) {
        let result: PlatformResult<()> = (|| {
            let mut env = self.ctx.vm.attach_current_thread()?;
            env.call_method(self.view.as_obj(), "setId", "(I)V", &[JValue::Int(id)])?;
            Ok(())
        })();
        if let Err(err) = result {
            log::warn!("AndroidPlatform: setId({id}) failed: {err}");
        }
    }

    fn scroll_x(&self) -> i32 {
        self.call_int_getter("getScrollX")
    }

    fn scroll_y(&self) -> i32 {
        self.call_int_getter("getScrollY")
    }

    fn scrollable_length(&self) -> i32 {
        self.call_int_getter("getScrollableLength")
    }

    fn scroll_to(&mut self, x: i32, y: i32) {
        self.call_scroll("scrollTo", x, y);
    }

    fn smooth_scroll_to(&mut self, x: i32, y: i32) {
        self.call_scroll("smoothScrollTo", x, y);
    }

    fn scroll_enabled(&self) -> bool {
        let result: PlatformResult<bool> = (|| {
            let mut env = self.ctx.vm.attach_current_thread()?;
            Ok(env
                .call_method(self.view.as_obj(), "getScrollEnabled", "()Z", &[])?
                .z()?)
        })();
        result.unwrap_or_else(|err| {
            log::warn!("AndroidPlatform: getScrollEnabled failed: {err}");
            true
        })
    }

    fn set_scroll_enabled(&mut self, enabled: bool) {
        self.call_bool_setter("setScrollEnabled", enabled);
    }

    fn set_user_interaction_enabled(&mut self, enabled: bool) {
        // Android couples these: an untouchable widget must also lose
        // keyboard focus and scrolling.
        self.call_bool_setter("setClickable", enabled);
        self.call_bool_setter("setFocusable", enabled);
        self.call_bool_setter("setScrollEnabled", enabled);
    }

    fn set_horizontal_scroll_bar_enabled(&mut self, enabled: bool) {
        self.call_bool_setter("setHorizontalScrollBarEnabled", enabled);
    }

    fn set_vertical_scroll_bar_enabled(&mut self, enabled: bool) {
        self.call_bool_setter("setVerticalScrollBarEnabled", enabled);
    }

    fn set_scroll_change_listener(&mut self, token: Option<ListenerToken>) {
        match token {
            Some(token) => self.call_bridge("registerScrollChangeListener", Some(token)),
            None => self.call_bridge("unregisterScrollChangeListener", None),
        }
    }

    fn add_scroll_observer(&mut self, token: ListenerToken) {
        self.call_bridge("addScrollObserver", Some(token));
    }

    fn remove_scroll_observer(&mut self, token: ListenerToken) {
        self.call_bridge("removeScrollObserver", Some(token));
    }
}

/*
 * JNI exports invoked by org.scrollduct.widgets.ScrollBridge on the UI
 * thread. The token travels as a jlong; a stale token resolves to nobody
 * and the callback is dropped.
 */

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_scrollduct_widgets_ScrollBridge_nativeOnScrollChange(
    _env: jni::JNIEnv,
    _class: JClass,
    token: jlong,
    x: jint,
    y: jint,
) {
    native_handle::dispatch_scroll_change(ListenerToken::from_raw(token as u64), x, y);
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_org_scrollduct_widgets_ScrollBridge_nativeOnScrollChanged(
    _env: jni::JNIEnv,
    _class: JClass,
    token: jlong,
) {
    native_handle::dispatch_scroll_changed(ListenerToken::from_raw(token as u64));
}

/// Installs the Android log backend for the `log` facade. Call once from
/// the JNI entry point before any widget is created.
pub fn init_logging() {
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(log::LevelFilter::Debug)
            .with_tag("scrollduct"),
    );
}
