use leptos::prelude::*;
use leptos_ui::variants;

variants! {
    Button {
        base: "inline-flex w-fit shrink-0 select-none items-center justify-center gap-2 whitespace-nowrap rounded-full text-sm font-medium transition-colors outline-none hover:cursor-pointer focus-visible:ring-2 focus-visible:ring-ring/60 disabled:pointer-events-none disabled:opacity-50 [&_svg]:pointer-events-none [&_svg]:shrink-0",
        variants: {
            variant: {
                Default: "bg-primary text-primary-foreground hover:bg-primary/85",
                Destructive: "bg-destructive text-white hover:bg-destructive/85",
                Outline: "border border-border bg-background hover:bg-muted",
                Ghost: "text-muted-foreground hover:bg-muted hover:text-foreground",
            },
            size: {
                Default: "h-10 px-5",
                Sm: "h-8 gap-1.5 px-3.5 text-xs",
                Icon: "size-9",
            }
        },
        component: {
            element: button,
            support_href: true,
            support_aria_current: true
        }
    }
}
