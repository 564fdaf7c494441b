use std::rc::Rc;

use yew::prelude::*;
use yew_router::prelude::*;
use log::{info, warn};
use web_sys::MouseEvent;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

mod config;
mod content;
mod engagement;
mod components {
    pub mod cta_button;
    pub mod lead_form;
    pub mod roi_calculator;
    pub mod tracked_section;
    pub mod welcome_banner;
}
mod pages {
    pub mod home;
}

use components::cta_button::scroll_to_section;
use engagement::analytics::{AnalyticsSink, HttpAnalyticsSink, LogAnalyticsSink};
use engagement::policy::KNOWN_SECTIONS;
use engagement::storage::{BrowserStorage, KeyValueStorage, MemoryStorage};
use engagement::{EngagementHandle, EngagementStore, ProfileUpdate};
use pages::home::{Home, NotFound};

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[not_found]
    #[at("/404")]
    NotFound,
}

/// Triggers a re-render of the app whenever the engagement store changes.
#[derive(Default, PartialEq)]
struct Revision(u64);

impl Reducible for Revision {
    type Action = ();

    fn reduce(self: Rc<Self>, _action: ()) -> Rc<Self> {
        Rc::new(Revision(self.0 + 1))
    }
}

fn open_store() -> EngagementStore {
    let storage: Rc<dyn KeyValueStorage> = match BrowserStorage::open() {
        Ok(storage) => Rc::new(storage),
        Err(e) => {
            warn!("{}, engagement will not persist across visits", e);
            Rc::new(MemoryStorage::new())
        }
    };
    let analytics: Rc<dyn AnalyticsSink> = if config::analytics_enabled() {
        Rc::new(HttpAnalyticsSink::new(config::analytics_endpoint()))
    } else {
        Rc::new(LogAnalyticsSink)
    };

    let mut store = EngagementStore::new(storage, analytics);
    store.initialize(ProfileUpdate::default());
    store
}

#[derive(Properties, PartialEq)]
pub struct NavProps {
    pub engagement: EngagementHandle,
}

#[function_component(Nav)]
pub fn nav(props: &NavProps) -> Html {
    let menu_open = use_state(|| false);
    let is_scrolled = use_state(|| false);

    {
        let is_scrolled = is_scrolled.clone();
        use_effect_with_deps(move |_| {
            let window = web_sys::window();
            let scroll_callback = {
                let window = window.clone();
                Closure::wrap(Box::new(move || {
                    let scroll_top = window
                        .as_ref()
                        .and_then(|w| w.scroll_y().ok())
                        .unwrap_or(0.0);
                    is_scrolled.set(scroll_top > 80.0);
                }) as Box<dyn FnMut()>)
            };

            if let Some(window) = &window {
                if let Err(e) = window.add_event_listener_with_callback("scroll", scroll_callback.as_ref().unchecked_ref()) {
                    warn!("Failed to add scroll listener: {:?}", e);
                }
            }

            move || {
                if let Some(window) = &window {
                    if let Err(e) = window.remove_event_listener_with_callback("scroll", scroll_callback.as_ref().unchecked_ref()) {
                        warn!("Failed to remove scroll listener: {:?}", e);
                    }
                }
            }
        }, ());
    }

    let toggle_menu = {
        let menu_open = menu_open.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            menu_open.set(!*menu_open);
        })
    };

    let menu_class = if *menu_open {
        "nav-right mobile-menu-open"
    } else {
        "nav-right"
    };

    let active = props.engagement.active_section();
    let profile = props.engagement.profile();

    html! {
        <nav class={classes!("top-nav", (*is_scrolled).then(|| "scrolled"))}>
            <div class="nav-content">
                <Link<Route> to={Route::Home} classes="nav-logo">
                    {"northstar growth"}
                </Link<Route>>

                <button class="burger-menu" onclick={toggle_menu}>
                    <span></span>
                    <span></span>
                    <span></span>
                </button>
                <div class={menu_class}>
                    { for KNOWN_SECTIONS.iter()
                        .filter(|id| !profile.dismissed_sections.iter().any(|d| d.as_str() == **id))
                        .map(|id| {
                            let menu_open = menu_open.clone();
                            let onclick = Callback::from(move |e: MouseEvent| {
                                e.prevent_default();
                                menu_open.set(false);
                                scroll_to_section(id);
                            });
                            let is_active = active.as_deref() == Some(*id);
                            html! {
                                <a href={format!("#{}", id)}
                                    class={classes!("nav-link", is_active.then(|| "active"))}
                                    {onclick}>
                                    {content::section_title(id)}
                                </a>
                            }
                        })
                    }
                </div>
            </div>
        </nav>
    }
}

#[function_component]
fn App() -> Html {
    let store = use_mut_ref(open_store);
    let revision = use_reducer(Revision::default);

    let on_change = {
        let dispatcher = revision.dispatcher();
        Callback::from(move |_: ()| dispatcher.dispatch(()))
    };
    let engagement = EngagementHandle::new(store, on_change);

    let switch = {
        let engagement = engagement.clone();
        move |routes: Route| match routes {
            Route::Home => {
                info!("Rendering Home page");
                html! { <Home engagement={engagement.clone()} /> }
            }
            Route::NotFound => html! { <NotFound /> },
        }
    };

    html! {
        <BrowserRouter>
            <Nav engagement={engagement.clone()} />
            <Switch<Route> render={switch} />
        </BrowserRouter>
    }
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    console_log::init_with_level(config::log_level()).expect("error initializing log");

    info!("Starting application");
    yew::Renderer::<App>::new().render();
}
