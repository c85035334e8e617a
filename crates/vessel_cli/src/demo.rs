//! Demo application body used by `vessel run`

use std::sync::Arc;

use parking_lot::Mutex;
use vessel_core::prelude::*;

/// Tag the demo logs under
pub const DEMO_TAG: &str = "demo";

/// What the demo observed during a run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DemoReport {
    /// Hook names in call order
    pub hooks: Vec<&'static str>,
    /// Frames rendered
    pub frames: u32,
    /// Touches delivered to the handler
    pub touches: Vec<TouchEvent>,
    /// Size of the configured resource, if it loaded
    pub resource_len: Option<usize>,
}

/// Logs every hook and holds the configured resource while initialized
pub struct DemoApp {
    resource_path: Option<String>,
    resource: Option<ResourceHandle>,
    report: Arc<Mutex<DemoReport>>,
}

impl DemoApp {
    pub fn new(resource_path: Option<String>) -> Self {
        Self {
            resource_path,
            resource: None,
            report: Arc::new(Mutex::new(DemoReport::default())),
        }
    }

    /// Shared view of the report, readable after the runtime is gone
    pub fn report(&self) -> Arc<Mutex<DemoReport>> {
        Arc::clone(&self.report)
    }

    fn hook(&self, ctx: &HookContext<'_>, name: &'static str) {
        ctx.log(LogLevel::Normal, DEMO_TAG, &format!("{} (from {})", name, ctx.state()));
        self.report.lock().hooks.push(name);
    }
}

impl Application for DemoApp {
    fn on_initialize(&mut self, ctx: &mut HookContext<'_>) {
        self.hook(ctx, "initialize");

        let Some(path) = self.resource_path.as_deref() else {
            return;
        };
        match ctx.resources().load(path) {
            Ok(handle) => {
                let len = ctx.resources().len(&handle);
                ctx.log(
                    LogLevel::Normal,
                    DEMO_TAG,
                    &format!("loaded {} ({} bytes)", path, len.unwrap_or(0)),
                );
                self.report.lock().resource_len = len;
                self.resource = Some(handle);
            }
            Err(e) => ctx.log(LogLevel::Warning, DEMO_TAG, &format!("{}", e)),
        }
    }

    fn on_visible(&mut self, ctx: &mut HookContext<'_>, new_context: bool) {
        self.hook(ctx, "visible");
        let size = ctx.surface_size();
        ctx.log(
            LogLevel::Debug,
            DEMO_TAG,
            &format!(
                "surface {}x{} (new context: {})",
                size.width, size.height, new_context
            ),
        );

        let report = Arc::clone(&self.report);
        ctx.set_touch_handler(Some(Box::new(move |event: TouchEvent| {
            report.lock().touches.push(event);
        })));
    }

    fn on_active(&mut self, ctx: &mut HookContext<'_>) {
        self.hook(ctx, "active");
    }

    fn on_inactive(&mut self, ctx: &mut HookContext<'_>) {
        self.hook(ctx, "inactive");
    }

    fn on_save_state(&mut self, ctx: &mut HookContext<'_>) {
        self.hook(ctx, "save_state");
    }

    fn on_hidden(&mut self, ctx: &mut HookContext<'_>) {
        self.hook(ctx, "hidden");
        ctx.set_touch_handler(None);
        if let Some(handle) = self.resource.take() {
            ctx.resources().unload(handle);
        }
    }

    fn on_render(&mut self, _ctx: &mut HookContext<'_>) {
        let mut report = self.report.lock();
        report.frames += 1;
        if report.hooks.last() != Some(&"render") {
            report.hooks.push("render");
        }
    }
}
