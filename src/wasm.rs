use std::cell::RefCell;
use std::rc::Rc;

use prism_ui::web::WebComponent;
use prism_ui::{ActiveLock, ColorComponent, ColorSet};
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element};

use crate::config::PickerConfig;
use crate::error::{PickerError, Result};
use crate::picker::Message;

thread_local! {
    /// Components stay bound for the lifetime of the page.
    static MOUNTED: RefCell<Vec<WebComponent<Message>>> = const { RefCell::new(Vec::new()) };
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    let stored = PickerConfig::load_from_local_storage();
    let config = stored.clone().unwrap_or_default();
    if let Err(e) = console_log::init_with_level(config.log_level.to_level()) {
        web_sys::console::log_1(&format!("Logger already initialized: {}", e).into());
    }
    if stored.is_none() {
        if let Err(e) = config.save_to_local_storage() {
            log::warn!("Could not store default configuration: {}", e);
        }
    }

    if let Err(e) = mount(&config) {
        log::error!("Failed to mount picker: {}", e);
    }
}

fn mount(config: &PickerConfig) -> Result<()> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| PickerError::Platform("No document in window".to_string()))?;
    let body = document
        .body()
        .ok_or_else(|| PickerError::Platform("No body in document".to_string()))?;

    let colors = Rc::new(RefCell::new(config.color_set()?));
    let lock = ActiveLock::new();
    let readout = create(&document, "div")?;
    append(&body, &readout)?;
    show(&readout, &colors.borrow());

    for (index, options) in config.components.iter().enumerate() {
        let component = ColorComponent::new(options, &lock)
            .map_err(|source| PickerError::Component { index, source })?
            .on_input(Message::ColorInput);
        let size = component.size();

        let root = create(&document, "div")?;
        root.set_attribute(
            "style",
            &format!(
                "width:{}px;height:{}px;margin-bottom:{}px;touch-action:none;border:{}px solid {}",
                size.width,
                size.height,
                config.gap,
                options.border_width,
                options.border_color
            ),
        )
        .map_err(js_error)?;
        root.set_attribute("title", component.label()).map_err(js_error)?;
        append(&body, &root)?;

        let shared = Rc::clone(&colors);
        let label = readout.clone();
        let mounted = WebComponent::attach(component, root, Rc::clone(&colors), move |message| {
            let Message::ColorInput(change) = message;
            log::debug!("{:?} on color {}", change.phase, change.color_index);
            if let Ok(colors) = shared.try_borrow() {
                show(&label, &colors);
            }
        })
        .map_err(js_error)?;
        MOUNTED.with(|m| m.borrow_mut().push(mounted));
    }

    log::info!("Mounted {} components", config.components.len());
    Ok(())
}

fn create(document: &Document, tag: &str) -> Result<Element> {
    document.create_element(tag).map_err(js_error)
}

fn append(parent: &Element, child: &Element) -> Result<()> {
    parent.append_child(child).map(|_| ()).map_err(js_error)
}

fn show(readout: &Element, colors: &ColorSet) {
    let text = colors
        .iter()
        .map(|color| color.to_hex())
        .collect::<Vec<_>>()
        .join(" ");
    readout.set_text_content(Some(&text));
}

fn js_error(value: JsValue) -> PickerError {
    PickerError::Platform(format!("{:?}", value))
}
