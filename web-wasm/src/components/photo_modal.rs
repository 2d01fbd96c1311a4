//! 写真モーダル
//!
//! キー操作・ホイール・スワイプ・サムネイルストリップ・読み込みプログレス。
//! このコンポーネントはセッションが開いている間だけマウントされるので、
//! ウィンドウのリスナーとタイマーはマウント中だけ存在する。

use gloo::timers::callback::{Interval, Timeout};
use leptos::ev;
use leptos::html;
use leptos::prelude::*;
use crate::browser;
use crate::components::{blur_image::BlurImage, buy_button::BuyButton, progress_bar::ProgressBar};
use folio_gallery_common::layout::{centering_scroll_left, strip_top, Rect};
use folio_gallery_common::progress::{HIDE_DELAY_MS, TICK_INTERVAL_MS};
use folio_gallery_common::viewer::ProjectInfo;
use folio_gallery_common::{
    GalleryController, Key, KeyOutcome, LoadProgress, ModalSession, SwipeTracker, WheelStepper,
};
use web_sys::{DomRect, PointerEvent, ScrollBehavior, ScrollToOptions, WheelEvent};

fn to_rect(r: &DomRect) -> Rect {
    Rect::new(r.left(), r.top(), r.width(), r.height())
}

#[component]
pub fn PhotoModal(ctrl: RwSignal<GalleryController>, on_close: Callback<()>) -> impl IntoView {
    let session = Memo::new(move |_| ctrl.with(|c| c.modal().cloned()));
    let current = Memo::new(move |_| {
        session.with(|s| s.as_ref().map(|s| s.current().to_string()).unwrap_or_default())
    });
    let index = Memo::new(move |_| session.with(|s| s.as_ref().map(|s| s.index()).unwrap_or(0)));
    let images = Memo::new(move |_| {
        session.with(|s| s.as_ref().map(|s| s.images().to_vec()).unwrap_or_default())
    });
    let has_prev = Memo::new(move |_| session.with(|s| s.as_ref().is_some_and(|s| s.has_prev())));
    let has_next = Memo::new(move |_| session.with(|s| s.as_ref().is_some_and(|s| s.has_next())));
    let shows_strip = Memo::new(move |_| session.with(|s| s.as_ref().is_some_and(|s| s.shows_strip())));
    let text_open = Memo::new(move |_| session.with(|s| s.as_ref().is_some_and(|s| s.text_open())));
    let project = Memo::new(move |_| session.with(|s| s.as_ref().and_then(|s| s.project().cloned())));

    let with_session = move |f: &dyn Fn(&mut ModalSession)| {
        ctrl.update(|c| {
            if let Some(m) = c.modal_mut() {
                f(m);
            }
        });
    };

    // ---- 読み込みプログレス ----
    let progress = RwSignal::new(LoadProgress::new());
    let ticker = StoredValue::new_local(None::<Interval>);
    let hide_timer = StoredValue::new_local(None::<Timeout>);

    Effect::new(move |_| {
        let src = current.get();
        progress.update(|p| {
            p.start(&src);
        });
    });

    Effect::new(move |_| {
        let (needs_ticker, needs_hide) = progress.with(|p| (p.needs_ticker(), p.needs_hide_timer()));

        ticker.update_value(|t| match (needs_ticker, t.is_some()) {
            (true, false) => {
                *t = Some(Interval::new(TICK_INTERVAL_MS, move || {
                    progress.try_update(|p| p.tick());
                }));
            }
            (false, true) => *t = None,
            _ => {}
        });
        hide_timer.update_value(|t| match (needs_hide, t.is_some()) {
            (true, false) => {
                *t = Some(Timeout::new(HIDE_DELAY_MS, move || {
                    progress.try_update(|p| p.hide_elapsed());
                }));
            }
            (false, true) => *t = None,
            _ => {}
        });
    });

    // ---- サムネイルストリップ ----
    let viewer_ref = NodeRef::<html::Div>::new();
    let strip_ref = NodeRef::<html::Div>::new();
    let strip_pos = RwSignal::new(None::<f64>);

    let position_strip = move || {
        if !shows_strip.get_untracked() {
            return;
        }
        let (Some(strip), Some(viewer)) = (strip_ref.get_untracked(), viewer_ref.get_untracked()) else {
            return;
        };
        let top = strip_top(
            browser::viewport_height(),
            to_rect(&viewer.get_bounding_client_rect()),
            strip.get_bounding_client_rect().height(),
        );
        strip_pos.set(Some(top));
    };

    // 開いたとき・画像が変わったときに位置を合わせる
    Effect::new(move |_| {
        current.track();
        request_animation_frame(position_strip);
    });

    // アクティブなサムネイルを中央へ
    Effect::new(move |_| {
        let idx = index.get();
        if !shows_strip.get() {
            return;
        }
        request_animation_frame(move || {
            let Some(strip) = strip_ref.get_untracked() else {
                return;
            };
            let Some(thumb) = strip.children().item(idx as u32) else {
                return;
            };
            let left = centering_scroll_left(
                to_rect(&strip.get_bounding_client_rect()),
                to_rect(&thumb.get_bounding_client_rect()),
                strip.scroll_left() as f64,
            );
            let opts = ScrollToOptions::new();
            opts.set_left(left);
            opts.set_behavior(ScrollBehavior::Smooth);
            strip.scroll_to_with_scroll_to_options(&opts);
        });
    });

    // ---- 入力 ----
    let keydown = window_event_listener(ev::keydown, move |ev| {
        let key = Key::from_key_name(&ev.key());
        let outcome = ctrl.try_update(|c| c.modal_mut().map(|m| m.handle_key(key))).flatten();
        if outcome == Some(KeyOutcome::Close) {
            on_close.run(());
        }
    });
    let resize = window_event_listener(ev::resize, move |_| position_strip());

    let wheel = StoredValue::new(WheelStepper::default());
    let on_wheel = move |ev: WheelEvent| {
        let now = browser::now_ms();
        let delta_y = ev.delta_y();
        let outcome = ctrl
            .try_update(|c| {
                c.modal_mut()
                    .and_then(|m| wheel.try_update_value(|w| w.on_wheel(m, delta_y, now)))
            })
            .flatten();
        // 背面ページをスクロールさせない
        if outcome.is_some_and(|o| o.consume) {
            ev.prevent_default();
        }
    };

    let swipe = StoredValue::new(SwipeTracker::default());
    let on_pointer_down = move |ev: PointerEvent| {
        swipe.update_value(|s| s.begin(ev.client_x() as f64, ev.client_y() as f64));
    };
    let on_pointer_up = move |ev: PointerEvent| {
        let direction = swipe
            .try_update_value(|s| s.end(ev.client_x() as f64, ev.client_y() as f64))
            .flatten();
        if let Some(direction) = direction {
            with_session(&|m| {
                m.handle_swipe(direction);
            });
        }
    };

    on_cleanup(move || {
        keydown.remove();
        resize.remove();
        ticker.try_update_value(|t| *t = None);
        hide_timer.try_update_value(|t| *t = None);
    });

    let on_image_load = Callback::new(move |_: ()| {
        progress.update(|p| p.loaded());
        position_strip();
    });
    let on_image_error = Callback::new(move |_: ()| {
        progress.update(|p| p.failed());
    });

    view! {
        <div
            class="photo-modal"
            on:wheel=on_wheel
            on:pointerdown=on_pointer_down
            on:pointerup=on_pointer_up
            on:pointercancel=move |_| swipe.update_value(|s| s.cancel())
        >
            <ProgressBar progress=progress />

            <div class="modal-header">
                <div class="modal-heading">
                    {move || match project.get() {
                        Some(info) => view! { <span>{info.heading()}</span> }.into_any(),
                        None => view! { <span class="invisible">"0"</span> }.into_any(),
                    }}
                </div>
                <div class="modal-actions">
                    {move || project.get().map(|info| view! { <BuyButton affordance=info.shop /> })}
                    <Show when=move || project.with(|p| p.as_ref().is_some_and(|p| p.text.is_some()))>
                        <button class="btn btn-small" on:click=move |_| with_session(&|m| m.toggle_text())>
                            "TEXT"
                        </button>
                    </Show>
                    <button class="btn btn-small" on:click=move |_| on_close.run(())>
                        "BACK"
                    </button>
                </div>
            </div>

            {move || project.get().and_then(|info: ProjectInfo| info.text).map(|text| {
                view! {
                    <div class="modal-text" class:open=move || text_open.get()>
                        <p>{text}</p>
                    </div>
                }
            })}

            <div class="modal-viewer" node_ref=viewer_ref>
                <Show when=move || has_prev.get()>
                    <button
                        class="nav-prev"
                        aria-label="Previous"
                        on:click=move |_| {
                            progress.update(|p| p.restart());
                            with_session(&|m| {
                                m.prev();
                            });
                        }
                    />
                </Show>
                <BlurImage
                    src=Signal::derive(move || current.get())
                    alt="Gallery"
                    class="modal-image"
                    fetch_placeholder=true
                    on_load=on_image_load
                    on_error=on_image_error
                />
                <Show when=move || has_next.get()>
                    <button
                        class="nav-next"
                        aria-label="Next"
                        on:click=move |_| {
                            progress.update(|p| p.restart());
                            with_session(&|m| {
                                m.next();
                            });
                        }
                    />
                </Show>
            </div>

            <Show when=move || shows_strip.get()>
                <div
                    class="thumb-strip"
                    node_ref=strip_ref
                    style=move || strip_pos.get().map(|top| format!("top: {}px", top)).unwrap_or_default()
                >
                    <For
                        each={move || images.get().into_iter().enumerate().collect::<Vec<_>>()}
                        key=|(i, src)| (*i, src.clone())
                        children=move |(i, src)| {
                            view! {
                                <button
                                    class="thumb"
                                    class:active=move || index.get() == i
                                    style="width: 30px; height: 40px"
                                    on:click=move |_| with_session(&|m| {
                                        m.go_to(i as isize);
                                    })
                                >
                                    <BlurImage src=src alt=format!("Thumbnail {}", i + 1) class="thumb-image" />
                                </button>
                            }
                        }
                    />
                </div>
            </Show>
        </div>
    }
}
