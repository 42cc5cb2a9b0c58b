use crate::api::ApiErrorKind;
use crate::components::ui::{
    Alert, AlertDescription, Button, ButtonSize, Card, CardContent, CardDescription, CardHeader,
    CardTitle, Field, Input, Spinner,
};
use crate::state::AppContext;
use crate::storage::{save_json_to_storage, USER_KEY};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;

#[component]
pub(crate) fn AdminLoginPage() -> impl IntoView {
    let email: RwSignal<String> = RwSignal::new(String::new());
    let password: RwSignal<String> = RwSignal::new(String::new());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let loading: RwSignal<bool> = RwSignal::new(false);

    let app = expect_context::<AppContext>().0;
    let navigate = StoredValue::new(use_navigate());

    if app.session.is_authenticated() {
        navigate.with_value(|nav| nav("/admin", Default::default()));
    }

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if loading.get_untracked() {
            return;
        }

        let email_val = email.get_untracked();
        let password_val = password.get_untracked();
        let mut api_client = app.client();

        loading.set(true);
        error.set(None);

        spawn_local(async move {
            match api_client.login(email_val.trim(), &password_val).await {
                Ok(response) => {
                    api_client.set_token(response.access_token);
                    api_client.save_to_storage();
                    save_json_to_storage(USER_KEY, &response.user);
                    if api_client.capabilities.needs_probe() {
                        api_client.capabilities.probe(&api_client).await;
                    }
                    app.api_client.set(api_client);
                    app.session.login();
                    password.set(String::new());
                    navigate.with_value(|nav| nav("/admin", Default::default()));
                }
                Err(e) => {
                    tracing::warn!("sign in failed: {e}");
                    let message = match e.kind {
                        ApiErrorKind::Unauthorized | ApiErrorKind::Http(400) => {
                            "Wrong email or password.".to_string()
                        }
                        _ => e.user_message(),
                    };
                    error.set(Some(message));
                }
            }
            loading.set(false);
        });
    };

    view! {
        <div class="min-h-screen bg-background">
            <div class="mx-auto flex min-h-screen w-full max-w-sm flex-col justify-center px-4 py-10">
                <div class="mb-6 flex items-center justify-center">
                    <a href="/" class="text-sm font-medium text-foreground">"Portfolio"</a>
                </div>

                <Card>
                    <CardHeader>
                        <CardTitle class="text-lg">"Admin sign in"</CardTitle>
                        <CardDescription class="text-xs">"Edit the site in place after signing in."</CardDescription>
                    </CardHeader>

                    <CardContent>
                        <form class="flex flex-col gap-3" on:submit=on_submit>
                            <Field label="Email" html_for="email" class="gap-1.5">
                                <Input
                                    id="email"
                                    r#type="email"
                                    placeholder="you@example.com"
                                    bind_value=email
                                    required=true
                                    class="h-8 text-sm"
                                />
                            </Field>

                            <Field label="Password" html_for="password" class="gap-1.5">
                                <Input
                                    id="password"
                                    r#type="password"
                                    placeholder="••••••••"
                                    bind_value=password
                                    required=true
                                    class="h-8 text-sm"
                                />
                            </Field>

                            <Show when=move || error.get().is_some() fallback=|| ().into_view()>
                                {move || {
                                    error.get().map(|e| {
                                        view! {
                                            <Alert class="border-destructive/30">
                                                <AlertDescription class="text-destructive text-xs">
                                                    {e}
                                                </AlertDescription>
                                            </Alert>
                                        }
                                    })
                                }}
                            </Show>

                            <Button
                                class="w-full"
                                size=ButtonSize::Sm
                                attr:disabled=move || loading.get()
                            >
                                <span class="inline-flex items-center gap-2">
                                    <Show when=move || loading.get() fallback=|| ().into_view()>
                                        <Spinner />
                                    </Show>
                                    {move || if loading.get() { "Signing in..." } else { "Sign in" }}
                                </span>
                            </Button>
                        </form>
                    </CardContent>
                </Card>
            </div>
        </div>
    }
}
