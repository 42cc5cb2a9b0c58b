use leptos::prelude::*;
use leptos_ui::clx;

mod components {
    use super::*;
    clx! {Card, section, "bg-card text-card-foreground flex flex-col gap-5 rounded-2xl border border-border/70 py-5"}
    clx! {CardHeader, header, "flex flex-col gap-1 border-b border-border/50 px-5 pb-4"}
    clx! {CardTitle, h2, "text-base font-semibold tracking-tight"}
    clx! {CardDescription, p, "text-muted-foreground text-xs"}
    clx! {CardContent, div, "px-5"}
}

pub use components::*;
