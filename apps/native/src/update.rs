use foliocore_shell::Route;
use foliod::{OverlayEffect, OverlayKey};
use iced::keyboard::{key, Event as KeyboardEvent, Key};
use iced::widget::operation;
use iced::Task;
use tracing::{debug, warn};

use crate::{App, Message};

pub(crate) fn update(app: &mut App, message: Message) -> Task<Message> {
    match message {
        Message::PollIndex => {
            app.refresh_index();
        }
        Message::Keyboard(event) => {
            let KeyboardEvent::KeyPressed { key, .. } = event else {
                return Task::none();
            };

            let overlay_key = match key.as_ref() {
                Key::Named(key::Named::Escape) => Some(OverlayKey::Escape),
                Key::Character(chars) => chars.chars().next().map(OverlayKey::Character),
                _ => None,
            };

            if let Some(overlay_key) = overlay_key {
                // The query input is the only editable field and holds focus while open.
                let in_text_field = app.service.overlay.is_open();
                let effect = app.service.overlay.handle_key(overlay_key, in_text_field);
                return run_effect(app, effect);
            }
        }
        Message::ToggleSearch => {
            let effect = app.service.overlay.toggle();
            return run_effect(app, effect);
        }
        Message::CloseSearch => {
            app.service.overlay.click_outside();
        }
        Message::QueryChanged(query) => {
            app.service.overlay.set_query(query);
        }
        Message::SubmitSearch => {
            let effect = app.service.overlay.submit();
            return run_effect(app, effect);
        }
        Message::ClearQuery => {
            let effect = app.service.overlay.clear();
            return run_effect(app, effect);
        }
        Message::ChoosePage(href) => {
            let Some(page) = app.index.page_by_href(&href).cloned() else {
                debug!(%href, "page result no longer in index");
                return Task::none();
            };
            let effect = app.service.overlay.choose_page(&page);
            return run_effect(app, effect);
        }
        Message::ChooseEntry(id) => {
            let Some(entry) = app.index.catalog_entry(&id).cloned() else {
                debug!(%id, "catalog result no longer in index");
                return Task::none();
            };
            let effect = app.service.overlay.choose_entry(&entry);
            return run_effect(app, effect);
        }
        Message::Navigate(path) => match Route::parse(&path) {
            Ok(route) => app.service.navigate(route),
            Err(err) => warn!(error = %err, %path, "ignoring navigation"),
        },
        Message::Back => {
            app.service.history.back();
        }
        Message::AddToCart(id) => {
            if let Some(entry) = app.index.catalog_entry(&id).cloned() {
                app.service.add_to_cart(&entry, 1);
            }
        }
        Message::SetQuantity(id, quantity) => {
            app.service.cart.update_quantity(&id, quantity);
        }
        Message::RemoveLine(id) => {
            app.service.cart.remove_item(&id);
        }
    }

    Task::none()
}

fn run_effect(app: &mut App, effect: Option<OverlayEffect>) -> Task<Message> {
    if app.service.apply(effect) {
        operation::focus(app.search_input_id.clone())
    } else {
        Task::none()
    }
}
