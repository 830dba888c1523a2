//! Error alerts shown to users when an action fails.
//!
//! Alerts are swapped into the `#alert-container` element of the base page,
//! usually via `hx-target-error` on forms.

use maud::{Markup, html};

/// A dismissable error message shown at the bottom of the page.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    /// The headline of the alert.
    pub message: String,
    /// Extra information shown below the headline.
    pub details: String,
}

impl Alert {
    /// Render the alert as an HTML fragment.
    pub fn into_html(self) -> Markup {
        // Template adapted from https://flowbite.com/docs/components/alerts/
        html! {
            div
                role="alert"
                class="flex items-start p-4 mb-4 rounded-lg border text-red-800 border-red-300 \
                    bg-red-50 dark:bg-gray-800 dark:text-red-400 dark:border-red-800"
            {
                div class="flex-1 text-sm"
                {
                    p class="font-semibold" { (self.message) }

                    @if !self.details.is_empty() {
                        p class="mt-1" { (self.details) }
                    }
                }

                button
                    type="button"
                    aria-label="Close"
                    onclick="this.closest('[role=alert]').remove()"
                    class="ms-3 -my-1.5 rounded-lg p-1.5 inline-flex items-center justify-center h-8 w-8"
                {
                    "✕"
                }
            }
        }
    }
}
