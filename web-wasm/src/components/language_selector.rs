//! 言語選択コンポーネント

use image2text_common::Language;
use leptos::prelude::*;

#[component]
pub fn LanguageSelector<F>(
    language: Signal<Language>,
    disabled: Signal<bool>,
    on_change: F,
) -> impl IntoView
where
    F: Fn(Language) + 'static + Clone,
{
    let options = Language::ALL
        .into_iter()
        .map(|lang| {
            let on_change = on_change.clone();
            view! {
                <button
                    type="button"
                    class=move || {
                        if language.get() == lang { "lang-option selected" } else { "lang-option" }
                    }
                    disabled=move || disabled.get()
                    on:click=move |_| on_change(lang)
                >
                    <span class="lang-flag">{lang.flag()}</span>
                    <span class="lang-name">{lang.display_name()}</span>
                    <span class="lang-code">{lang.code()}</span>
                </button>
            }
        })
        .collect_view();

    view! {
        <div class="language-selector">
            <label>"Select Language"</label>
            <div class="lang-options">{options}</div>
        </div>
    }
}
