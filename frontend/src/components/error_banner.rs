use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ErrorBannerProps {
    pub message: String,
}

/// Persistent alert for failures the page cannot recover from, such as an
/// unusable map configuration.
#[function_component(ErrorBanner)]
pub fn error_banner(props: &ErrorBannerProps) -> Html {
    let is_open = use_state(|| true);

    {
        let is_open = is_open.clone();
        use_effect_with(props.message.clone(), move |_| {
            is_open.set(true);
        });
    }

    if props.message.trim().is_empty() || !*is_open {
        return Html::default();
    }

    let dismiss = {
        let is_open = is_open.clone();
        Callback::from(move |_: MouseEvent| is_open.set(false))
    };

    html! {
        <div class={classes!("error-banner", "alert", "alert-danger")} role="alert" aria-live="assertive">
            <p class="error-banner-title">{"The map could not be loaded"}</p>
            <p>{ props.message.clone() }</p>
            <button
                type="button"
                class="error-banner-close"
                aria-label="Dismiss error"
                onclick={dismiss}
            >
                {"×"}
            </button>
        </div>
    }
}
