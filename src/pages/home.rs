use super::projects::ProjectGrid;
use super::sections::{ContentSection, ContentText};
use crate::models::ProjectCategory;
use leptos::prelude::*;

const ABOUT_DETAILS: [(&str, &str, &str); 3] = [
    ("01", "SPECIALTY", "AI-driven automation"),
    ("02", "EXPERIENCE", "Vibe coding and teaching"),
    ("03", "MISSION", "Maximum leverage per hour"),
];

const WORK_STEPS: [(&str, &str, &str); 4] = [
    ("01", "Plan and structure", "Start from the user and design the whole system"),
    ("02", "Fast prototype", "Build the core first and validate it quickly"),
    ("03", "Automate and refine", "Automate the repetitive parts and keep improving"),
    ("04", "Ship it", "Finish with the quality bar intact"),
];

#[component]
pub(crate) fn HomePage() -> impl IntoView {
    view! {
        <div class="flex flex-col">
            <HeroSection />
            <AboutSection />
            <WorkProcessSection />
            <ProjectsSection />
            <ContactSection />
        </div>
    }
}

#[component]
fn HeroSection() -> impl IntoView {
    view! {
        <ContentSection section="hero" class="relative flex min-h-screen items-center overflow-hidden">
            <div class="relative z-10 mx-auto w-full max-w-[1100px] px-8">
                <h1 class="mb-8 text-[clamp(60px,12vw,160px)] font-extrabold leading-[0.9] tracking-[-0.05em]">
                    <ContentText field="title_line1" default="CREATIVE" class="block" />
                    <span class="block text-transparent [-webkit-text-stroke:2px_currentColor]">
                        <ContentText field="title_line2" default="NON-DEVELOPER" />
                    </span>
                    <ContentText field="title_line3" default="& DESIGNER" class="block" />
                </h1>
                <p class="mb-12 text-xl font-light text-muted-foreground">
                    <ContentText field="subtitle" default="Digital experiences built by vibe coding" />
                </p>
                <a href="/projects" class="inline-flex items-center gap-4 bg-foreground px-12 py-6 font-medium tracking-wide text-background">
                    <ContentText field="cta_button" default="See the work" />
                    <span>"→"</span>
                </a>
            </div>

            <div class="absolute right-[10%] top-[20%] text-sm font-extralight tracking-widest text-muted-foreground">
                <ContentText field="floating_year" default="2025" />
            </div>
            <div class="absolute bottom-[30%] right-[25%] text-sm font-extralight tracking-widest text-muted-foreground">
                <ContentText field="floating_location" default="SEOUL" />
            </div>
            <div class="absolute bottom-[15%] left-[8%] text-sm font-extralight tracking-widest text-muted-foreground">
                <ContentText field="floating_portfolio" default="PORTFOLIO" />
            </div>
        </ContentSection>
    }
}

#[component]
fn AboutSection() -> impl IntoView {
    view! {
        <ContentSection section="about" id="about" class="mx-auto w-full max-w-[1100px] px-8 py-32">
            <h2 class="mb-10 text-5xl font-black leading-tight tracking-tight">
                <ContentText field="main_title_line1" default="Before the thought" class="block" />
                <ContentText field="main_title_line2" default="is finished, the prototype" class="block" />
                <ContentText field="main_title_line3" default="is already running" class="block" />
            </h2>
            <p class="mb-16 max-w-2xl text-lg text-muted-foreground">
                <ContentText field="description_line1" default="Making a busy day simpler and repetitive work automatic," class="block" />
                <ContentText field="description_line2" default="so your time goes further." class="block" />
            </p>
            <div class="grid gap-8 sm:grid-cols-3">
                {ABOUT_DETAILS.into_iter().map(|(number, label, fallback)| view! {
                    <div class="flex flex-col gap-2 border-t pt-6">
                        <span class="text-xs text-muted-foreground">{number} " " {label}</span>
                        <ContentText field=format!("detail_{number}") default=fallback class="text-lg font-semibold" />
                    </div>
                }).collect_view()}
            </div>
        </ContentSection>
    }
}

#[component]
fn WorkProcessSection() -> impl IntoView {
    view! {
        <ContentSection section="work_process" class="bg-muted/40 py-32">
            <div class="mx-auto w-full max-w-[1100px] px-8">
                <h2 class="mb-16 text-6xl font-black tracking-tight">
                    <ContentText field="title_line1" default="MY" class="block" />
                    <ContentText field="title_line2" default="WORK" class="block" />
                </h2>
                <ol class="grid gap-10 sm:grid-cols-2">
                    {WORK_STEPS.into_iter().map(|(number, title, description)| view! {
                        <li class="flex gap-6">
                            <span class="text-4xl font-extralight text-muted-foreground">{number}</span>
                            <div class="flex flex-col gap-2">
                                <ContentText field=format!("step{number}_title") default=title class="text-xl font-semibold" />
                                <ContentText
                                    field=format!("step{number}_description")
                                    default=description
                                    multiline=true
                                    class="text-sm text-muted-foreground"
                                />
                            </div>
                        </li>
                    }).collect_view()}
                </ol>
            </div>
        </ContentSection>
    }
}

#[component]
fn ProjectsSection() -> impl IntoView {
    view! {
        <ContentSection section="projects" id="projects" class="mx-auto w-full max-w-[1100px] px-8 py-32">
            <p class="mb-2 text-xs tracking-[0.3em] text-muted-foreground">
                <ContentText field="section_subtitle" default="SELECTED WORKS" />
            </p>
            <h2 class="mb-16 text-5xl font-black tracking-tight">
                <ContentText field="section_title" default="Projects" />
            </h2>

            <div class="mb-20 flex flex-col gap-6">
                <div>
                    <h3 class="text-2xl font-bold"><ContentText field="vibe_title" default="VIBE CODING" /></h3>
                    <p class="text-sm text-muted-foreground">
                        <ContentText field="vibe_subtitle" default="Prototypes running before the idea is done" />
                    </p>
                </div>
                <ProjectGrid category=ProjectCategory::Vibe />
            </div>

            <div class="flex flex-col gap-6">
                <div>
                    <h3 class="text-2xl font-bold"><ContentText field="automation_title" default="AUTOMATION" /></h3>
                    <p class="text-sm text-muted-foreground">
                        <ContentText field="automation_subtitle" default="Systems that take repetitive work off your hands" />
                    </p>
                </div>
                <ProjectGrid category=ProjectCategory::Automation />
            </div>
        </ContentSection>
    }
}

#[component]
fn ContactSection() -> impl IntoView {
    view! {
        <ContentSection section="contact" id="contact" class="bg-foreground py-32 text-background">
            <div class="mx-auto w-full max-w-[1100px] px-8">
                <p class="mb-2 text-xs tracking-[0.3em] opacity-60">
                    <ContentText field="section_subtitle" default="GET IN TOUCH" />
                </p>
                <h2 class="mb-6 text-5xl font-black tracking-tight">
                    <ContentText field="section_title" default="Let's build it together" />
                </h2>
                <p class="mb-16 max-w-xl whitespace-pre-line opacity-80">
                    <ContentText
                        field="description"
                        default="New projects, collaboration ideas, or just a hello.\nReach out any time."
                        multiline=true
                    />
                </p>

                <dl class="grid gap-8 sm:grid-cols-2">
                    <ContactItem label="Email" field="email" default="contact@example.com" />
                    <ContactItem label="Threads" field="threads" default="@portfolio_threads" />
                    <ContactItem label="Chat" field="kakao" default="1:1 chat" />
                    <ContactItem label="Chat link" field="kakao_link" default="https://pf.kakao.com/_example" />
                    <ContactItem label="Community" field="opentalk" default="Vibe coding community" />
                    <ContactItem label="Community link" field="opentalk_link" default="https://open.kakao.com/o/example" />
                </dl>

                <div class="mt-20 flex flex-col items-start gap-6 border-t border-background/20 pt-12">
                    <p class="opacity-80">
                        <ContentText field="cta_text" default="Have a project or a proposal? Get in touch." />
                    </p>
                    <span class="bg-background px-10 py-4 font-medium text-foreground">
                        <ContentText field="cta_button" default="Start a project" />
                    </span>
                </div>
            </div>
        </ContentSection>
    }
}

#[component]
fn ContactItem(label: &'static str, field: &'static str, default: &'static str) -> impl IntoView {
    view! {
        <div class="flex flex-col gap-1">
            <dt class="text-xs uppercase tracking-widest opacity-60">{label}</dt>
            <dd class="text-lg"><ContentText field=field default=default /></dd>
        </div>
    }
}
