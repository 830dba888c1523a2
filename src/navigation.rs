//! This file defines the templates and a convenience function for creating the navigation bar.

use maud::{Markup, html};

use crate::{
    auth::{CurrentUser, Role},
    endpoints,
    html::COMPANY_NAME,
};

/// Template for a link in the navigation bar.
///
/// It will change appearance if `is_current` is set to
/// `true`. Only one link should be set as active at any one time.
#[derive(Clone)]
struct Link<'a> {
    url: &'a str,
    title: &'a str,
    is_current: bool,
}

impl Link<'_> {
    fn into_desktop_html(self) -> Markup {
        let style = if self.is_current {
            "block py-2 px-3 text-white bg-blue-700 rounded-sm lg:bg-transparent
        lg:text-blue-700 lg:p-0 dark:text-white lg:dark:text-blue-500"
        } else {
            "block py-2 px-3 text-gray-900 rounded-sm hover:bg-gray-100
        lg:hover:bg-transparent lg:border-0 lg:hover:text-blue-700 lg:p-0
        dark:text-white lg:dark:hover:text-blue-500 dark:hover:bg-gray-700
        dark:hover:text-white lg:dark:hover:bg-transparent"
        };

        html!( a href=(self.url) class=(style) { (self.title) } )
    }

    fn into_mobile_html(self) -> Markup {
        let style = if self.is_current {
            "flex w-full min-w-0 items-center justify-center rounded-lg \
            bg-blue-50 px-2.5 py-2 text-xs font-semibold leading-tight \
            text-blue-700 shadow-sm sm:px-4 sm:text-sm \
            dark:bg-blue-900/30 dark:text-blue-200"
        } else {
            "flex w-full min-w-0 items-center justify-center rounded-lg \
            px-2.5 py-2 text-xs font-semibold leading-tight text-gray-600 \
            sm:px-4 sm:text-sm \
            hover:bg-blue-50/70 hover:text-blue-700 dark:text-gray-300 \
            dark:hover:bg-blue-900/20 dark:hover:text-blue-200"
        };

        html! {
            a
                href=(self.url)
                class=(style)
                aria-current=[self.is_current.then_some("page")]
            {
                span class="truncate" { (self.title) }
            }
        }
    }
}

pub struct NavBar<'a> {
    links: Vec<Link<'a>>,
    trucker_name: &'a str,
}

impl<'a> NavBar<'a> {
    /// Get the navigation bar for `user`.
    ///
    /// Staff get links to every staff page, members only get their own records.
    /// If a link matches `active_endpoint`, then that link will be
    /// marked as active and displayed differently in the HTML.
    pub fn new(active_endpoint: &str, user: &'a CurrentUser) -> NavBar<'a> {
        let pages: &[(&str, &str)] = match user.role {
            Role::Staff => &[
                (endpoints::RECORDS_VIEW, "Records"),
                (endpoints::PURCHASE_ORDERS_VIEW, "Purchase Orders"),
                (endpoints::CASH_RECORDS_VIEW, "Cash Records"),
                (endpoints::USERS_VIEW, "Users"),
            ],
            Role::Member => &[(endpoints::MEMBER_DASHBOARD_VIEW, "My Records")],
        };

        let mut links: Vec<Link> = pages
            .iter()
            .map(|&(url, title)| Link {
                url,
                title,
                is_current: active_endpoint == url,
            })
            .collect();
        links.push(Link {
            url: endpoints::LOG_OUT,
            title: "Log out",
            is_current: false,
        });

        NavBar {
            links,
            trucker_name: &user.trucker_name,
        }
    }

    pub fn into_html(self) -> Markup {
        let links = self.links;
        let column_count = links.len();

        // Template adapted from https://flowbite.com/docs/components/navbar/#default-navbar
        html!(
            nav class="bg-white border-gray-200 dark:bg-gray-900 no-print"
            {
                div
                    class="max-w-screen-xl flex flex-wrap items-center justify-between mx-auto p-4"
                {
                    a
                        href=(endpoints::ROOT)
                        class="flex flex-col"
                    {
                        span
                            class="self-start text-xl font-semibold whitespace-nowrap dark:text-white"
                        {
                            (COMPANY_NAME)
                        }

                        span
                            id="nav-trucker-name"
                            class="text-sm text-gray-500 dark:text-gray-400"
                        {
                            "Signed in as " (self.trucker_name)
                        }
                    }

                    div class="hidden w-full lg:block lg:w-auto"
                    {
                        ul
                            class="font-medium flex flex-col p-4 lg:p-0 mt-4
                            border border-gray-100 rounded bg-gray-50
                            lg:flex-row lg:space-x-8 rtl:space-x-reverse lg:mt-0
                            lg:border-0 lg:bg-white dark:bg-gray-800
                            lg:dark:bg-gray-900 dark:border-gray-700"
                        {
                            @for link in links.clone().into_iter() {
                                li { (link.into_desktop_html()) }
                            }
                        }
                    }
                }
            }

            nav class="fixed inset-x-0 bottom-0 z-40 lg:hidden no-print"
            {
                div class="mx-auto max-w-screen-xl px-4 pb-4"
                {
                    div
                        class="rounded-xl border border-gray-200 bg-white/95
                        shadow-lg backdrop-blur dark:border-gray-700 dark:bg-gray-900/95"
                    {
                        ul
                            class="grid gap-2 px-4 py-3 text-xs font-semibold
                            text-gray-600 dark:text-gray-300"
                            style=(format!("grid-template-columns: repeat({column_count}, minmax(0, 1fr));"))
                            aria-label="Primary"
                        {
                            @for link in links.into_iter() {
                                li class="min-w-0" { (link.into_mobile_html()) }
                            }
                        }
                    }
                }
            }
        )
    }
}

#[cfg(test)]
mod nav_bar_tests {
    use crate::{
        auth::{CurrentUser, Role, UserID},
        endpoints,
        navigation::NavBar,
    };

    fn user(role: Role) -> CurrentUser {
        CurrentUser {
            id: UserID::new(1),
            email: "juan@example.com".to_owned(),
            trucker_name: "Juan Dela Cruz".to_owned(),
            role,
        }
    }

    #[test]
    fn set_active_endpoint() {
        let staff = user(Role::Staff);
        let cases = [
            (endpoints::RECORDS_VIEW, true),
            (endpoints::PURCHASE_ORDERS_VIEW, true),
            (endpoints::CASH_RECORDS_VIEW, true),
            (endpoints::USERS_VIEW, true),
            (endpoints::ROOT, false),
            (endpoints::PRINT_VIEW, false),
            (endpoints::INTERNAL_ERROR_VIEW, false),
            (endpoints::LOG_IN_VIEW, false),
            (endpoints::LOG_OUT, false),
            (endpoints::TRANSACTIONS_API, false),
        ];

        for (endpoint, should_be_active) in cases {
            let nav_bar = NavBar::new(endpoint, &staff);

            assert_link_active(nav_bar, endpoint, should_be_active);
        }
    }

    #[test]
    fn staff_see_staff_pages() {
        let staff = user(Role::Staff);
        let nav_bar = NavBar::new(endpoints::RECORDS_VIEW, &staff);

        let urls: Vec<&str> = nav_bar.links.iter().map(|link| link.url).collect();

        assert_eq!(
            urls,
            [
                endpoints::RECORDS_VIEW,
                endpoints::PURCHASE_ORDERS_VIEW,
                endpoints::CASH_RECORDS_VIEW,
                endpoints::USERS_VIEW,
                endpoints::LOG_OUT,
            ]
        );
    }

    #[test]
    fn members_only_see_their_records() {
        let member = user(Role::Member);
        let nav_bar = NavBar::new(endpoints::MEMBER_DASHBOARD_VIEW, &member);

        let urls: Vec<&str> = nav_bar.links.iter().map(|link| link.url).collect();

        assert_eq!(urls, [endpoints::MEMBER_DASHBOARD_VIEW, endpoints::LOG_OUT]);
        assert!(nav_bar.links[0].is_current);
    }

    #[test]
    fn shows_trucker_name() {
        let member = user(Role::Member);

        let html = NavBar::new(endpoints::MEMBER_DASHBOARD_VIEW, &member)
            .into_html()
            .into_string();

        assert!(html.contains("Juan Dela Cruz"));
    }

    #[track_caller]
    fn assert_link_active(nav_bar: NavBar<'_>, endpoint: &str, should_be_active: bool) {
        for link in nav_bar.links {
            if link.url == endpoint {
                assert_eq!(
                    link.is_current, should_be_active,
                    "link {} should have is_current = {should_be_active}",
                    link.url
                );
            } else {
                assert!(!link.is_current, "link {} should be inactive", link.url);
            }
        }
    }
}
