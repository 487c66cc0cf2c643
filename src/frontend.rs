use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Array;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    window, Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
    MouseEvent, ScrollBehavior, ScrollToOptions,
};
use yew::prelude::*;

use crate::engine::{ScrollEngine, ViewState, SECTION_IDS};

const ACTIVE_SECTION_ROOT_MARGIN: &str = "-40% 0px -40% 0px";
const REVEAL_ROOT_MARGIN: &str = "0px 0px -10% 0px";
const REVEAL_VISIBLE_RATIO: f64 = 0.15;
const REVEAL_INDEX_ATTR: &str = "data-reveal-index";
const REVEALED_CLASS: &str = "is-revealed";
const ORB_COUNT: usize = 12;

const NAV_LABELS: [&str; 7] = [
    "Home",
    "About",
    "CI/CD",
    "AWS",
    "Tooling",
    "Deployment",
    "Contact",
];

const PIPELINE_STEPS: [(&str, &str); 5] = [
    (
        "1. Source & Lint",
        "Pre-commit hooks and static analysis maintain code quality.",
    ),
    (
        "2. Test",
        "Unit and component tests run in parallel for fast feedback.",
    ),
    (
        "3. Build",
        "Optimized production bundles with cache-busting assets.",
    ),
    (
        "4. Security",
        "Dependency and container scans block vulnerable releases.",
    ),
    (
        "5. Deploy",
        "Zero-downtime rollout with health checks and monitoring.",
    ),
];

const AWS_TILES: [&str; 6] = [
    "S3 + CloudFront",
    "Route 53",
    "ECS/EKS",
    "RDS/DynamoDB",
    "CloudWatch",
    "IAM",
];

const TOOLING_PILLS: [&str; 8] = [
    "Rust",
    "Yew",
    "Trunk",
    "cargo test",
    "Clippy",
    "GitHub Actions",
    "Docker",
    "Terraform",
];

fn read_scroll_metrics() -> Option<(f64, f64)> {
    let window = window()?;
    let document = window.document()?;
    let root = document.document_element()?;
    let offset = window.scroll_y().ok()?;
    let viewport_height = window.inner_height().ok()?.as_f64()?;
    let scrollable_height = f64::from(root.scroll_height()) - viewport_height;

    Some((offset, scrollable_height))
}

fn scroll_to_top() {
    let Some(window) = window() else {
        return;
    };

    let options = ScrollToOptions::new();
    options.set_top(0.0);
    options.set_behavior(ScrollBehavior::Smooth);
    window.scroll_to_with_scroll_to_options(&options);
}

fn current_year() -> u32 {
    js_sys::Date::new_0().get_full_year()
}

struct ScrollBindings {
    engine: Rc<RefCell<ScrollEngine>>,
    section_observer: IntersectionObserver,
    reveal_observer: IntersectionObserver,
    scroll_handler: Closure<dyn FnMut()>,
    _section_handler: Closure<dyn FnMut(Array)>,
    _reveal_handler: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

impl ScrollBindings {
    // Everything fallible happens before the first listener or observation
    // is registered, so a bailed mount never leaves a live callback behind.
    fn mount(on_change: Callback<ViewState>) -> Option<Self> {
        let window = window()?;
        let document = window.document()?;
        let engine = Rc::new(RefCell::new(ScrollEngine::new()));

        let scroll_handler = {
            let engine = engine.clone();
            let on_change = on_change.clone();
            Closure::<dyn FnMut()>::new(move || {
                let Some((offset, scrollable_height)) = read_scroll_metrics() else {
                    return;
                };

                let snapshot = {
                    let mut engine = engine.borrow_mut();
                    if !engine.sample_scroll(offset, scrollable_height) {
                        return;
                    }
                    engine.view().clone()
                };
                on_change.emit(snapshot);
            })
        };

        let section_handler = {
            let engine = engine.clone();
            let on_change = on_change.clone();
            Closure::<dyn FnMut(Array)>::new(move |entries: Array| {
                let batch = entries
                    .iter()
                    .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                    .map(|entry| (entry.target().id(), entry.is_intersecting()))
                    .collect::<Vec<_>>();

                let snapshot = {
                    let mut engine = engine.borrow_mut();
                    let changed = engine
                        .apply_section_batch(batch.iter().map(|(id, hit)| (id.as_str(), *hit)));
                    if !changed {
                        return;
                    }
                    engine.view().clone()
                };
                on_change.emit(snapshot);
            })
        };
        let section_options = IntersectionObserverInit::new();
        section_options.set_root_margin(ACTIVE_SECTION_ROOT_MARGIN);
        let section_observer = IntersectionObserver::new_with_options(
            section_handler.as_ref().unchecked_ref(),
            &section_options,
        )
        .ok()?;

        let reveal_handler = {
            let engine = engine.clone();
            Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
                move |entries: Array, observer: IntersectionObserver| {
                    for entry in entries
                        .iter()
                        .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                    {
                        if !entry.is_intersecting() {
                            continue;
                        }

                        let target = entry.target();
                        let Some(index) = target
                            .get_attribute(REVEAL_INDEX_ATTR)
                            .and_then(|raw| raw.parse::<usize>().ok())
                        else {
                            continue;
                        };

                        if engine.borrow_mut().mark_revealed(index) {
                            let _ = target.class_list().add_1(REVEALED_CLASS);
                        }
                        // One-shot per element: once revealed it leaves the
                        // observed set for good.
                        observer.unobserve(&target);
                    }
                },
            )
        };
        let reveal_options = IntersectionObserverInit::new();
        reveal_options.set_root_margin(REVEAL_ROOT_MARGIN);
        reveal_options.set_threshold(&JsValue::from(REVEAL_VISIBLE_RATIO));
        let reveal_observer = IntersectionObserver::new_with_options(
            reveal_handler.as_ref().unchecked_ref(),
            &reveal_options,
        )
        .ok()?;

        let reveal_targets = document.query_selector_all("[data-reveal]").ok()?;

        let _ = window
            .add_event_listener_with_callback("scroll", scroll_handler.as_ref().unchecked_ref());
        let _ = window
            .add_event_listener_with_callback("resize", scroll_handler.as_ref().unchecked_ref());

        for id in SECTION_IDS {
            if let Some(anchor) = document.get_element_by_id(id) {
                section_observer.observe(&anchor);
            }
        }

        for position in 0..reveal_targets.length() {
            let Some(node) = reveal_targets.item(position) else {
                continue;
            };
            let Ok(element) = node.dyn_into::<Element>() else {
                continue;
            };

            let index = engine.borrow_mut().track_reveal_target();
            let _ = element.set_attribute(REVEAL_INDEX_ATTR, &index.to_string());
            reveal_observer.observe(&element);
        }

        let initial = {
            let mut engine = engine.borrow_mut();
            if let Some((offset, scrollable_height)) = read_scroll_metrics() {
                engine.sample_scroll(offset, scrollable_height);
            }
            engine.view().clone()
        };
        on_change.emit(initial);

        Some(Self {
            engine,
            section_observer,
            reveal_observer,
            scroll_handler,
            _section_handler: section_handler,
            _reveal_handler: reveal_handler,
        })
    }

    fn dispose(self) {
        // State goes inert before anything detaches, so a callback racing
        // disposal lands on a no-op instead of a stale write.
        self.engine.borrow_mut().dispose();
        self.section_observer.disconnect();
        self.reveal_observer.disconnect();

        if let Some(window) = window() {
            let _ = window.remove_event_listener_with_callback(
                "scroll",
                self.scroll_handler.as_ref().unchecked_ref(),
            );
            let _ = window.remove_event_listener_with_callback(
                "resize",
                self.scroll_handler.as_ref().unchecked_ref(),
            );
        }
    }
}

#[derive(Properties, PartialEq)]
struct TopNavProps {
    active_section_id: &'static str,
}

#[function_component(TopNav)]
fn top_nav(props: &TopNavProps) -> Html {
    html! {
        <nav class="top-nav" aria-label="Primary">
            <div class="brand">{"DevOps Journey"}</div>
            <div class="links">
                { for SECTION_IDS.iter().zip(NAV_LABELS.iter()).map(|(id, label)| {
                    let is_active = props.active_section_id == *id;
                    html! {
                        <a
                            class={classes!("nav-link", is_active.then_some("active"))}
                            href={format!("#{id}")}
                            aria-current={is_active.then_some("true")}
                        >
                            {*label}
                        </a>
                    }
                }) }
            </div>
        </nav>
    }
}

#[derive(Properties, PartialEq)]
struct CardProps {
    title: AttrValue,
    #[prop_or_default]
    children: Children,
}

#[function_component(Card)]
fn card(props: &CardProps) -> Html {
    html! {
        <article class="card reveal" data-reveal="">
            <h3>{props.title.clone()}</h3>
            {props.children.clone()}
        </article>
    }
}

fn bullet_list(items: &[&'static str]) -> Html {
    html! {
        <ul>
            { for items.iter().map(|item| html! { <li>{*item}</li> }) }
        </ul>
    }
}

#[function_component(App)]
fn app() -> Html {
    let view = use_state_eq(ViewState::initial);

    {
        let view = view.clone();
        use_effect_with((), move |_| {
            let on_change = Callback::from(move |next: ViewState| view.set(next));
            let bindings = ScrollBindings::mount(on_change);

            move || {
                if let Some(bindings) = bindings {
                    bindings.dispose();
                }
            }
        });
    }

    let on_back_to_top = Callback::from(|_: MouseEvent| scroll_to_top());
    let progress_style = format!("--scroll-progress: {:.2}%;", view.scroll_progress_percent);

    html! {
        <div class="page">
            <div class="bg" aria-hidden="true">
                <div class="gradient" />
                <div class="stars" />
                <div class="twinkles" />
                <div class="orbs">
                    { for (0..ORB_COUNT).map(|_| html! { <span /> }) }
                </div>
            </div>

            <div class="scroll-progress" style={progress_style} aria-hidden="true" />

            <TopNav active_section_id={view.active_section_id} />

            <header id="hero" class="hero">
                <div class="hero-inner glass">
                    <h1>{"Welcome to my first DevOps project"}</h1>
                    <p>
                        {"Fully automated with CI/CD, Infrastructure as Code, and cloud-native \
                          services. Scroll to explore the stack, pipeline, and deployment."}
                    </p>
                    <div class="cta-row">
                        <a class="btn primary" href="#pipeline">{"See the Pipeline"}</a>
                        <a class="btn ghost" href="#about">{"Learn More"}</a>
                    </div>
                </div>
            </header>

            <main>
                <section id="about" class="section">
                    <div class="container">
                        <h2>{"About the Project"}</h2>
                        <p>
                            {"This project demonstrates how modern DevOps practices accelerate \
                              delivery while improving reliability. It includes branch-based \
                              workflows, automated tests, and continuous deployment to a cloud \
                              environment."}
                        </p>
                        <div class="cards">
                            <Card title="Objectives">
                                { bullet_list(&[
                                    "Automate build, test, and deploy",
                                    "Ensure repeatable infra with IaC",
                                    "Enable rapid, safe iterations",
                                ]) }
                            </Card>
                            <Card title="Outcomes">
                                { bullet_list(&[
                                    "Faster feedback cycles",
                                    "Reduced manual effort and risk",
                                    "Observable and auditable pipelines",
                                ]) }
                            </Card>
                            <Card title="Security">
                                { bullet_list(&[
                                    "Dependency scanning",
                                    "Secrets management",
                                    "Least-privileged IAM roles",
                                ]) }
                            </Card>
                        </div>
                    </div>
                </section>

                <section id="pipeline" class="section alt">
                    <div class="container">
                        <h2>{"CI/CD Pipeline"}</h2>
                        <p>
                            {"A typical run: lint → unit tests → build → security checks → \
                              package → deploy. On main branch merges, an automated production \
                              release is triggered."}
                        </p>
                        <div class="timeline">
                            { for PIPELINE_STEPS.iter().map(|(title, detail)| html! {
                                <div class="step reveal" data-reveal="">
                                    <h4>{*title}</h4>
                                    <p>{*detail}</p>
                                </div>
                            }) }
                        </div>
                    </div>
                </section>

                <section id="aws" class="section">
                    <div class="container">
                        <h2>{"Running on AWS"}</h2>
                        <p>
                            {"Hosted using AWS services. Common architectures include S3 + \
                              CloudFront for static hosting, or ECS/EKS for containerized \
                              workloads with Application Load Balancers and auto scaling."}
                        </p>
                        <div class="grid">
                            { for AWS_TILES.iter().map(|tile| html! {
                                <div class="tile reveal" data-reveal="">{*tile}</div>
                            }) }
                        </div>
                    </div>
                </section>

                <section id="tooling" class="section alt">
                    <div class="container">
                        <h2>{"Tooling"}</h2>
                        <p>{"Languages, package managers, and CI providers used in the stack."}</p>
                        <ul class="pill-list reveal" data-reveal="">
                            { for TOOLING_PILLS.iter().map(|pill| html! { <li>{*pill}</li> }) }
                        </ul>
                    </div>
                </section>

                <section id="deploy" class="section">
                    <div class="container">
                        <h2>{"Deployment Strategy"}</h2>
                        <p>
                            {"Uses environment-specific configuration and infrastructure \
                              promotion. Features are validated in staging before production."}
                        </p>
                        <div class="cards">
                            <Card title="Blue/Green">
                                <p>{"Switch traffic only after the new environment is healthy."}</p>
                            </Card>
                            <Card title="Canary">
                                <p>{"Gradually increase traffic while monitoring metrics."}</p>
                            </Card>
                            <Card title="Rollback">
                                <p>{"Fast, automated revert to last known good version."}</p>
                            </Card>
                        </div>
                    </div>
                </section>

                <section id="contact" class="section alt">
                    <div class="container">
                        <h2>{"Contact"}</h2>
                        <p>
                            {"Want to learn more or collaborate? Reach out and let's build \
                              something great."}
                        </p>
                        <div class="contact-grid">
                            <a class="btn primary" href="mailto:example@example.com">{"Email Me"}</a>
                            <a class="btn ghost" href="#hero">{"Back to Top"}</a>
                        </div>
                    </div>
                </section>
            </main>

            <footer class="footer">
                <div class="container">
                    <small>{format!("© {} DevOps Journey • Built with Rust & Yew", current_year())}</small>
                </div>
            </footer>

            if view.show_back_to_top {
                <button
                    class="back-to-top"
                    type="button"
                    aria-label="Back to top"
                    onclick={on_back_to_top}
                >
                    <span aria-hidden="true">{"↑"}</span>
                </button>
            }
        </div>
    }
}

pub fn run() {
    yew::Renderer::<App>::with_root(
        window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("app"))
            .expect("missing #app mount point"),
    )
    .render();
}
