use crate::components::ui::{Button, ButtonSize, Spinner};
use crate::content::save_drafts;
use crate::pages::HomePage;
use crate::state::AppContext;
use crate::util::alert;
use leptos::prelude::*;
use leptos::task::spawn_local;

fn drafts_status_class(unsaved: usize) -> &'static str {
    if unsaved > 0 {
        "text-xs text-amber-600"
    } else {
        "text-xs text-muted-foreground"
    }
}

fn drafts_status(unsaved: usize) -> String {
    match unsaved {
        0 => "All changes saved".to_string(),
        1 => "1 unsaved draft".to_string(),
        n => format!("{n} unsaved drafts"),
    }
}

/// The home page with edit affordances, plus the drafts toolbar.
#[component]
pub(crate) fn AdminDashboardPage() -> impl IntoView {
    let app = expect_context::<AppContext>().0;
    let saving = RwSignal::new(false);
    let unsaved = Memo::new(move |_| app.drafts.with(|d| d.pending().len()));

    let save_all = move |_: web_sys::MouseEvent| {
        let pending = app.drafts.with_untracked(|d| d.pending());
        if pending.is_empty() || saving.get_untracked() {
            return;
        }
        let total = pending.len();
        saving.set(true);

        spawn_local(async move {
            let saved = save_drafts(app.client(), pending).await;
            app.update_drafts(|d| {
                for s in &saved {
                    d.mark_synced(&s.section, &s.field, s.updated_ms);
                }
                d.prune();
            });
            app.content_revision.update(|r| *r += 1);
            saving.set(false);

            if saved.len() < total {
                alert(&format!(
                    "{} of {total} drafts could not be saved. They are kept on this device.",
                    total - saved.len()
                ));
            }
        });
    };

    view! {
        <div class="flex flex-col">
            <div class="sticky top-0 z-30 flex items-center justify-between gap-4 border-b bg-background/90 px-6 py-3 text-sm backdrop-blur">
                <div class="flex items-center gap-2">
                    <span class="font-medium">"Editing home page"</span>
                    <span class="text-xs text-muted-foreground">"Click any text to edit it."</span>
                </div>
                <div class="flex items-center gap-3">
                    <span class=move || { drafts_status_class(unsaved.get()) }>
                        {move || drafts_status(unsaved.get())}
                    </span>
                    <Button
                        size=ButtonSize::Sm
                        attr:disabled=move || saving.get() || unsaved.get() == 0
                        on:click=save_all
                    >
                        <Show when=move || saving.get() fallback=|| ().into_view()>
                            <Spinner />
                        </Show>
                        "Save all"
                    </Button>
                </div>
            </div>
            <HomePage />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drafts_status_line() {
        assert_eq!(drafts_status(0), "All changes saved");
        assert_eq!(drafts_status(1), "1 unsaved draft");
        assert_eq!(drafts_status(3), "3 unsaved drafts");
        assert!(drafts_status_class(2).contains("amber"));
        assert!(drafts_status_class(0).contains("muted"));
    }
}
