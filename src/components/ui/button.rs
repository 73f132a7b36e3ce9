use leptos::prelude::*;
use leptos_ui::variants;

// Class names come from the server-rendered stylesheet (`static/css/style.css`).
variants! {
    Button {
        base: "btn inline-flex items-center gap-2 disabled:opacity-50",
        variants: {
            variant: {
                Default: "btn-primary",
                Secondary: "btn-secondary",
                Ghost: "btn-ghost",
            },
            size: {
                Default: "",
                Sm: "btn-sm",
            }
        },
        component: {
            element: button,
            support_href: true,
            support_aria_current: true
        }
    }
}
