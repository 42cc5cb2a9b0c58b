use crate::api::SettingsStore;
use crate::components::ui::{
    Button, ButtonSize, Card, CardContent, CardDescription, CardHeader, CardTitle, ErrorAlert, Field, Input,
    PageSpinner, Spinner, Textarea,
};
use crate::models::{changed_keys, resolve_values, settings_in, SettingDef, SettingKind, SettingTab};
use crate::pages::projects::tab_class;
use crate::state::AppContext;
use crate::util::alert;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::collections::BTreeMap;
use strum::IntoEnumIterator;

type Values = BTreeMap<&'static str, String>;

/// One signal per known setting, bound straight to its input.
#[derive(Clone, Copy)]
struct SettingsForm {
    fields: StoredValue<BTreeMap<&'static str, RwSignal<String>>>,
    baseline: RwSignal<Values>,
}

impl SettingsForm {
    fn new() -> Self {
        let defaults = resolve_values(&[]);
        let fields = defaults
            .iter()
            .map(|(k, v)| (*k, RwSignal::new(v.clone())))
            .collect();
        Self {
            fields: StoredValue::new(fields),
            baseline: RwSignal::new(defaults),
        }
    }

    fn field(&self, key: &str) -> Option<RwSignal<String>> {
        self.fields.with_value(|f| f.get(key).copied())
    }

    fn current(&self) -> Values {
        self.fields
            .with_value(|f| f.iter().map(|(k, s)| (*k, s.get())).collect())
    }

    fn reset_to(&self, values: Values) {
        self.fields.with_value(|f| {
            for (k, s) in f {
                if let Some(v) = values.get(k) {
                    s.set(v.clone());
                }
            }
        });
        self.baseline.set(values);
    }
}

#[component]
pub(crate) fn AdminSettingsPage() -> impl IntoView {
    let app = expect_context::<AppContext>().0;
    let form = SettingsForm::new();
    let tab = RwSignal::new(SettingTab::General);
    let loaded = RwSignal::new(false);
    let saving = RwSignal::new(false);
    let error: RwSignal<Option<String>> = RwSignal::new(None);

    let load = move || {
        spawn_local(async move {
            match app.client().list_settings().await {
                Ok(stored) => {
                    form.reset_to(resolve_values(&stored));
                    error.set(None);
                }
                Err(e) => {
                    tracing::error!("loading settings failed: {e}");
                    error.set(Some(e.user_message()));
                }
            }
            loaded.set(true);
        });
    };
    load();

    let dirty = Memo::new(move |_| form.baseline.with(|b| changed_keys(b, &form.current())));

    let on_save = move |_: web_sys::MouseEvent| {
        if saving.get_untracked() {
            return;
        }
        let edited = form.current();
        let keys = dirty.get_untracked();
        if keys.is_empty() {
            return;
        }
        saving.set(true);
        spawn_local(async move {
            let client = app.client();
            let mut saved = form.baseline.get_untracked();
            let mut failed = Vec::new();
            for key in keys {
                let value = edited.get(key).cloned().unwrap_or_default();
                match client.upsert_setting(key, &value).await {
                    Ok(()) => {
                        saved.insert(key, value);
                    }
                    Err(e) => {
                        tracing::error!("saving setting {key} failed: {e}");
                        failed.push(key);
                    }
                }
            }
            // Failed keys keep their edited values and stay dirty.
            form.baseline.set(saved);
            saving.set(false);
            if failed.is_empty() {
                tracing::info!("settings saved");
            } else {
                alert(&format!("Some settings could not be saved: {}", failed.join(", ")));
            }
        });
    };

    view! {
        <div class="mx-auto w-full max-w-3xl px-6 py-10">
            <div class="mb-6 flex items-center justify-between gap-4">
                <h1 class="text-2xl font-bold tracking-tight">"Site settings"</h1>
                <Button
                    size=ButtonSize::Sm
                    attr:disabled=move || saving.get() || dirty.with(Vec::is_empty)
                    on:click=on_save
                >
                    <Show when=move || saving.get() fallback=|| ().into_view()>
                        <Spinner />
                    </Show>
                    {move || match dirty.with(Vec::len) {
                        0 => "Saved".to_string(),
                        n => format!("Save {n} change{}", if n == 1 { "" } else { "s" }),
                    }}
                </Button>
            </div>

            <ErrorAlert message=error on_retry=Callback::new(move |_| load()) />

            <div class="mb-4 flex gap-2" role="tablist">
                {SettingTab::iter().map(|t| view! {
                    <button
                        type="button"
                        role="tab"
                        class=move || tab_class(tab.get() == t)
                        on:click=move |_| tab.set(t)
                    >
                        {t.label()}
                    </button>
                }).collect_view()}
            </div>

            <Show when=move || loaded.get() fallback=|| view! { <PageSpinner /> }>
                <Card>
                    <CardHeader>
                        <CardTitle>{move || tab.get().label()}</CardTitle>
                        <CardDescription>"Changes are kept here until you save."</CardDescription>
                    </CardHeader>
                    <CardContent class="flex flex-col gap-5">
                        {move || {
                            settings_in(tab.get())
                                .filter_map(|def| form.field(def.key).map(|value| view! { <SettingField def=*def value=value /> }))
                                .collect_view()
                        }}
                    </CardContent>
                </Card>
            </Show>
        </div>
    }
}

#[component]
fn SettingField(def: SettingDef, value: RwSignal<String>) -> impl IntoView {
    let id = format!("setting-{}", def.key);

    let input = match def.kind {
        SettingKind::Toggle => view! {
            <input
                id=id.clone()
                type="checkbox"
                class="size-4"
                prop:checked=move || value.get() == "true"
                on:change=move |ev| value.set(event_target_checked(&ev).to_string())
            />
        }
        .into_any(),
        SettingKind::Color => view! {
            <div class="flex items-center gap-3">
                <input
                    type="color"
                    class="h-9 w-16 cursor-pointer rounded border"
                    prop:value=move || value.get()
                    on:input=move |ev| value.set(event_target_value(&ev))
                />
                <Input id=id.clone() bind_value=value placeholder="#000000" />
            </div>
        }
        .into_any(),
        SettingKind::LongText => view! { <Textarea id=id.clone() bind_value=value rows=3 /> }.into_any(),
        kind => view! {
            <Input id=id.clone() r#type=kind.input_type() bind_value=value placeholder=def.hint.unwrap_or_default() />
        }
        .into_any(),
    };

    view! {
        <Field label=def.label html_for=id hint=def.hint>
            {input}
        </Field>
    }
}
